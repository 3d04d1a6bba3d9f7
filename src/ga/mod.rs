//! Genetic Algorithm.
//!
//! Population-based evolutionary optimization over flattened problem
//! genomes: tournament selection with a fixed tournament size, uniform
//! crossover, per-gene mutation, and μ+λ survivor selection (parents and
//! offspring merged, truncated by descending fitness). Stops early when the
//! variance of the last 10 best-fitness values falls below the configured
//! threshold.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final result with statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod config;
mod runner;
mod selection;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, Scored};
pub use selection::tournament;
