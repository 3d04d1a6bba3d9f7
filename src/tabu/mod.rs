//! Tabu Search (TS).
//!
//! Single-solution trajectory optimization with a fixed-size FIFO
//! short-term memory of recent move keys. The best non-tabu neighbor is
//! taken each iteration, unless a tabu move would set a new global best —
//! the aspiration criterion overrides the restriction.
//!
//! # References
//!
//! - Glover (1989), "Tabu Search—Part I"
//! - Glover (1990), "Tabu Search—Part II"

mod config;
mod runner;

pub use config::TabuConfig;
pub use runner::{select_move, ScoredMove, TabuResult, TabuRunner};
