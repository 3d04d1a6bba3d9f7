//! Simulated Annealing (SA).
//!
//! Single-solution trajectory optimization with a geometric cooling
//! schedule. Improving neighbors are accepted unconditionally; worsening
//! ones with probability `exp(Δ/T)`, allowing early escape from local
//! optima. Terminates at the minimum temperature or the iteration cap.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{acceptance_probability, SaResult, SaRunner};
