//! Particle Swarm Optimization (PSO).
//!
//! Swarm-based optimization driven by velocity dynamics: each particle
//! blends inertia, a cognitive pull toward its personal best and a social
//! pull toward the swarm's global best. Velocities are clamped per
//! dimension; positions are clamped to the variable domain, with the weight
//! simplex renormalized after every update.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod config;
mod runner;

pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner};
