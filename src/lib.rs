//! Multi-objective constrained optimization engine for marketing decisions.
//!
//! Provides a shared problem/solution data model and six classical
//! metaheuristics behind one dispatch contract:
//!
//! - **Genetic Algorithm (GA)**: Population-based evolutionary search with
//!   tournament selection, uniform crossover, and elitist replacement.
//! - **Simulated Annealing (SA)**: Single-solution trajectory search with
//!   geometric cooling and Metropolis acceptance.
//! - **Particle Swarm Optimization (PSO)**: Swarm search driven by inertia,
//!   cognitive, and social velocity terms.
//! - **Hill Climbing**: Steepest-ascent local search; terminates at the
//!   first local optimum.
//! - **Tabu Search (TS)**: Local search with short-term move memory and
//!   aspiration to escape cycling.
//! - **Differential Evolution (DE)**: rand/1/bin differential mutation with
//!   greedy selection.
//!
//! # Architecture
//!
//! Problems are expressed in marketing terms ([`model`]), encoded onto a
//! numeric genome ([`encoding`]), and scored by caller-supplied evaluators
//! ([`fitness`]). The [`engine`] orchestrates: it selects a strategy per
//! problem, consults a FIFO+TTL solution cache, optionally routes to a
//! pluggable [`backend`], falls back to the [`classical`] library on any
//! backend failure, and attaches an [`analysis`] report to every solution.

pub mod analysis;
pub mod backend;
pub mod classical;
pub mod de;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod events;
pub mod fitness;
pub mod ga;
pub mod hill;
pub mod model;
pub mod pso;
pub mod sa;
pub mod tabu;

pub use classical::{Algorithm, ClassicalSolver, SolverParams};
pub use engine::{EngineConfig, OptimizationEngine};
pub use error::{EngineError, ValidationError};
pub use model::{OptimizationProblem, OptimizationSolution, ProblemKind};
