//! DE execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::config::DeConfig;
use crate::encoding::{Genome, SearchSpace};

/// Result of a Differential Evolution run.
#[derive(Debug, Clone)]
pub struct DeResult {
    /// The best genome found.
    pub best: Genome,

    /// Fitness of the best genome.
    pub best_fitness: f64,

    /// Total generations executed.
    pub generations: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Best fitness at the end of each generation.
    pub fitness_history: Vec<f64>,

    /// Final population, sorted by descending fitness.
    pub final_population: Vec<(Genome, f64)>,
}

/// Executes Differential Evolution, rand/1/bin variant.
///
/// For each target individual, a mutant `a + F·(b − c)` is formed from
/// three distinct other individuals, a binomial crossover at rate `CR`
/// produces the trial vector (one forced dimension guarantees the trial
/// differs from the target), and greedy selection replaces the target only
/// when the trial is strictly better. Exactly one trial evaluation happens
/// per individual per generation.
pub struct DeRunner;

impl DeRunner {
    /// Runs DE optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`DeConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &DeConfig) -> DeResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs DE with an optional deadline and cancellation token, both
    /// checked once per generation.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &DeConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> DeResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid DeConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let n = config.population_size;
        let dims = space.len();

        let mut population: Vec<Genome> = (0..n).map(|_| space.sample(&mut rng)).collect();
        let mut fitnesses: Vec<f64> = population.iter().map(|g| fitness(g)).collect();

        let mut best_idx = argmax(&fitnesses);
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(fitnesses[best_idx]);

        let mut generations = 0;
        let mut cancelled = false;
        let mut timed_out = false;

        for _ in 0..config.max_generations {
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

            // Build all N trial vectors first, then evaluate them as a
            // batch: exactly N evaluations per generation.
            let trials: Vec<Genome> = (0..n)
                .map(|i| {
                    let (a, b, c) = pick_three_distinct(n, i, &mut rng);
                    let mut trial = population[i].clone();
                    let forced = rng.random_range(0..dims);
                    for d in 0..dims {
                        if d == forced || rng.random_bool(config.crossover_rate) {
                            trial[d] = population[a][d]
                                + config.differential_weight
                                    * (population[b][d] - population[c][d]);
                        }
                    }
                    space.clamp(&mut trial);
                    trial
                })
                .collect();

            let trial_fitnesses: Vec<f64> = if config.parallel {
                trials.par_iter().map(|g| fitness(g)).collect()
            } else {
                trials.iter().map(|g| fitness(g)).collect()
            };

            // Greedy 1:1 selection: the trial replaces its target only when
            // strictly better.
            for (i, (trial, tf)) in trials.into_iter().zip(trial_fitnesses).enumerate() {
                if tf > fitnesses[i] {
                    population[i] = trial;
                    fitnesses[i] = tf;
                }
            }

            best_idx = argmax(&fitnesses);
            generations += 1;
            fitness_history.push(fitnesses[best_idx]);
        }

        let best = population[best_idx].clone();
        let best_fitness = fitnesses[best_idx];

        let mut final_population: Vec<(Genome, f64)> =
            population.into_iter().zip(fitnesses).collect();
        final_population
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        DeResult {
            best,
            best_fitness,
            generations,
            cancelled,
            timed_out,
            fitness_history,
            final_population,
        }
    }
}

/// Picks three distinct indices, all different from `target`.
fn pick_three_distinct<R: Rng>(n: usize, target: usize, rng: &mut R) -> (usize, usize, usize) {
    debug_assert!(n >= 4);
    let mut pick = || loop {
        let i = rng.random_range(0..n);
        if i != target {
            return i;
        }
    };
    let a = pick();
    let b = loop {
        let i = pick();
        if i != a {
            break i;
        }
    };
    let c = loop {
        let i = pick();
        if i != a && i != b {
            break i;
        }
    };
    (a, b, c)
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
