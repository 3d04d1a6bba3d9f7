//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SaConfig;
use crate::encoding::{Genome, SearchSpace};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best genome found.
    pub best: Genome,

    /// Fitness of the best genome.
    pub best_fitness: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Best fitness recorded at each iteration.
    pub fitness_history: Vec<f64>,
}

/// Probability of accepting a candidate with fitness change `delta` at
/// temperature `temperature`.
///
/// Exactly 1 for an improving candidate; `exp(Δ/T)` otherwise (Metropolis
/// criterion for maximization, Δ ≤ 0).
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta > 0.0 {
        1.0
    } else if temperature > 0.0 {
        (delta / temperature).exp()
    } else {
        0.0
    }
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`SaConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &SaConfig) -> SaResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs SA with an optional deadline and cancellation token, both
    /// checked once per iteration.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &SaConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SaResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid SaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = space.sample(&mut rng);
        let mut current_fitness = fitness(&current);
        let mut best = current.clone();
        let mut best_fitness = current_fitness;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut timed_out = false;

        let mut fitness_history = Vec::new();
        fitness_history.push(best_fitness);

        while temperature > config.min_temperature && iterations < config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                break;
            }

            let neighbor = space.neighbor(&current, &mut rng, config.neighbor_scale);
            let neighbor_fitness = fitness(&neighbor);
            let delta = neighbor_fitness - current_fitness;

            if delta > 0.0 {
                improving_moves += 1;
            }
            let accept = rng.random_range(0.0..1.0) < acceptance_probability(delta, temperature);

            if accept {
                current = neighbor;
                current_fitness = neighbor_fitness;
                accepted_moves += 1;

                if current_fitness > best_fitness {
                    best = current.clone();
                    best_fitness = current_fitness;
                }
            }

            iterations += 1;
            fitness_history.push(best_fitness);
            temperature *= config.cooling_rate;
        }

        SaResult {
            best,
            best_fitness,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            timed_out,
            fitness_history,
        }
    }
}
