//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation →
//! survivor merge → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::config::GaConfig;
use super::selection::tournament;
use crate::encoding::{Genome, SearchSpace};

/// Window over which best-fitness variance is measured for convergence.
pub(crate) const CONVERGENCE_WINDOW: usize = 10;

/// A genome paired with its fitness.
#[derive(Debug, Clone)]
pub struct Scored {
    /// The candidate genome.
    pub genome: Genome,
    /// Fitness of the genome (higher is better).
    pub fitness: f64,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best genome found during the entire run.
    pub best: Genome,

    /// Best fitness value.
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Generation at which the convergence criterion first held, if any.
    pub converged_at: Option<usize>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Best fitness at the end of each generation. Non-decreasing: the
    /// survivor merge never discards the incumbent best.
    pub fitness_history: Vec<f64>,

    /// Final population, sorted by descending fitness.
    pub final_population: Vec<Scored>,
}

/// Executes the GA evolutionary loop.
///
/// Best effort within budget: for a well-formed search space this never
/// fails, it returns the best solution found when the generation cap,
/// convergence criterion, deadline or cancellation stops it.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &GaConfig) -> GaResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs the GA with an optional deadline and cancellation token.
    ///
    /// Both are checked once per generation (cooperative, not preemptive);
    /// on either signal the best solution found so far is returned.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &GaConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid GaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        // 1. Initial population of random valid assignments
        let genomes: Vec<Genome> = (0..config.population_size)
            .map(|_| space.sample(&mut rng))
            .collect();
        let mut population = evaluate_all(genomes, fitness, config.parallel);
        sort_descending(&mut population);

        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(population[0].fitness);

        let mut generations = 0;
        let mut converged_at = None;
        let mut cancelled = false;
        let mut timed_out = false;

        // 2. Evolutionary loop
        for generation in 0..config.max_generations {
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

            // Offspring via tournament selection, uniform crossover,
            // per-gene mutation.
            let mut offspring_genomes = Vec::with_capacity(config.population_size);
            while offspring_genomes.len() < config.population_size {
                let p1 = &population[tournament(&population, config.tournament_size, &mut rng)];
                let p2 = &population[tournament(&population, config.tournament_size, &mut rng)];

                let mut child = if rng.random_bool(config.crossover_rate) {
                    uniform_crossover(&p1.genome, &p2.genome, &mut rng)
                } else {
                    p1.genome.clone()
                };
                space.mutate(&mut child, &mut rng, config.mutation_rate, config.mutation_scale);
                offspring_genomes.push(child);
            }
            let offspring = evaluate_all(offspring_genomes, fitness, config.parallel);

            // μ+λ survivor selection: merge parents and offspring, keep the
            // best population_size individuals.
            population.extend(offspring);
            sort_descending(&mut population);
            population.truncate(config.population_size);

            generations = generation + 1;
            fitness_history.push(population[0].fitness);

            // Convergence: variance of the recent best-fitness tail.
            if fitness_history.len() >= CONVERGENCE_WINDOW
                && tail_variance(&fitness_history, CONVERGENCE_WINDOW)
                    < config.convergence_threshold
            {
                converged_at = Some(generation);
                break;
            }
        }

        let best = population[0].clone();
        GaResult {
            best: best.genome,
            best_fitness: best.fitness,
            generations,
            converged_at,
            cancelled,
            timed_out,
            fitness_history,
            final_population: population,
        }
    }
}

/// Gene-wise uniform crossover: each gene is taken from either parent with
/// equal probability.
fn uniform_crossover<R: Rng>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
        .collect()
}

/// Evaluates a batch of genomes, optionally in parallel.
fn evaluate_all<F>(genomes: Vec<Genome>, fitness: &F, parallel: bool) -> Vec<Scored>
where
    F: Fn(&Genome) -> f64 + Sync,
{
    if parallel {
        genomes
            .into_par_iter()
            .map(|genome| {
                let f = fitness(&genome);
                Scored { genome, fitness: f }
            })
            .collect()
    } else {
        genomes
            .into_iter()
            .map(|genome| {
                let f = fitness(&genome);
                Scored { genome, fitness: f }
            })
            .collect()
    }
}

fn sort_descending(population: &mut [Scored]) {
    population.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Variance of the trailing `window` values.
pub(crate) fn tail_variance(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Objective, OptimizationProblem, ProblemKind, Variable};

    fn space(n: usize) -> SearchSpace {
        let mut p = OptimizationProblem::new("ga", ProblemKind::ResourceAllocation)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            });
        for i in 0..n {
            p = p.with_variable(Variable::continuous(format!("x{i}"), -5.0, 5.0));
        }
        SearchSpace::from_problem(&p)
    }

    /// Inverted sphere: maximum 0 at the origin.
    fn sphere(genome: &Genome) -> f64 {
        -genome.iter().map(|x| x * x).sum::<f64>()
    }

    #[test]
    fn test_ga_improves_sphere() {
        let space = space(4);
        let config = GaConfig::default()
            .with_max_generations(100)
            .with_parallel(false)
            .with_seed(42);
        let result = GaRunner::run(&space, &sphere, &config);
        assert!(result.best_fitness > -0.5, "got {}", result.best_fitness);
        assert!(result.best_fitness >= result.fitness_history[0]);
    }

    #[test]
    fn test_best_fitness_non_decreasing() {
        let space = space(6);
        let config = GaConfig::default()
            .with_max_generations(60)
            .with_parallel(false)
            .with_seed(7);
        let result = GaRunner::run(&space, &sphere, &config);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0] - 1e-12,
                "best-so-far decreased: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_convergence_early_stop() {
        let space = space(2);
        // Constant landscape: variance of the best-fitness tail is zero
        // immediately after the window fills.
        let flat = |_: &Genome| 1.0;
        let config = GaConfig::default()
            .with_max_generations(500)
            .with_convergence_threshold(1e-6)
            .with_parallel(false)
            .with_seed(1);
        let result = GaRunner::run(&space, &flat, &config);
        assert!(result.converged_at.is_some());
        assert!(result.generations < 500);
    }

    #[test]
    fn test_cancellation_returns_best_so_far() {
        let space = space(3);
        let cancel = Arc::new(AtomicBool::new(true));
        let config = GaConfig::default().with_parallel(false).with_seed(9);
        let result =
            GaRunner::run_with_budget(&space, &sphere, &config, None, Some(cancel));
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(!result.final_population.is_empty());
    }

    #[test]
    fn test_deadline_stops_run() {
        let space = space(3);
        let config = GaConfig::default().with_parallel(false).with_seed(9);
        let deadline = Some(Instant::now() - std::time::Duration::from_millis(1));
        let result = GaRunner::run_with_budget(&space, &sphere, &config, deadline, None);
        assert!(result.timed_out);
    }

    #[test]
    fn test_weight_simplex_preserved() {
        let p = OptimizationProblem::new("w", ProblemKind::ChannelOptimization)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::weight("a"))
            .with_variable(Variable::weight("b"))
            .with_variable(Variable::weight("c"));
        let space = SearchSpace::from_problem(&p);
        // Favor lopsided weight vectors to force movement.
        let fitness = |g: &Genome| g[0];
        let config = GaConfig::default()
            .with_max_generations(30)
            .with_parallel(false)
            .with_seed(5);
        let result = GaRunner::run(&space, &fitness, &config);
        for scored in &result.final_population {
            let sum: f64 = scored.genome.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
        }
    }

    #[test]
    fn test_tail_variance() {
        assert_eq!(tail_variance(&[1.0, 1.0, 1.0], 10), 0.0);
        let v = tail_variance(&[0.0, 2.0], 2);
        assert!((v - 1.0).abs() < 1e-12);
    }
}
