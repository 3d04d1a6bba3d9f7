//! Hill climbing.
//!
//! Steepest-ascent local search over a generated neighborhood: take the
//! best improving neighbor each iteration, stop at the first iteration with
//! none (or at the cap). Deliberately has no escape mechanism; callers
//! wanting restarts wrap the runner themselves.

mod config;
mod runner;

pub use config::HillConfig;
pub use runner::{HillResult, HillRunner};
