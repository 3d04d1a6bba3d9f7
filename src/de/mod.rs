//! Differential Evolution (DE).
//!
//! Population-based optimization using differential mutation: each target
//! individual receives a mutant `a + F·(b − c)` built from three distinct
//! other individuals, recombined by binomial crossover and kept only when
//! strictly better (greedy selection).
//!
//! # References
//!
//! - Storn & Price (1997), "Differential Evolution — A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"

mod config;
mod runner;

pub use config::DeConfig;
pub use runner::{DeResult, DeRunner};
