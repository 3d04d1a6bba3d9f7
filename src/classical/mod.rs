//! Unified entry point for the classical metaheuristic library.
//!
//! [`ClassicalSolver::optimize`] runs one of the six algorithms against a
//! validated problem and returns the best solution found within budget.
//! The contract is best-effort: for a well-formed problem this never fails,
//! even when the result is suboptimal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::de::{DeConfig, DeRunner};
use crate::encoding::{Genome, SearchSpace};
use crate::fitness::{Evaluator, ProblemEvaluator};
use crate::ga::{GaConfig, GaRunner};
use crate::hill::{HillConfig, HillRunner};
use crate::model::{
    ExecutionMetrics, OptimizationProblem, OptimizationSolution, RankedAssignment,
};
use crate::pso::{PsoConfig, PsoRunner};
use crate::sa::{SaConfig, SaRunner};
use crate::tabu::{TabuConfig, TabuRunner};

/// The six classical metaheuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Genetic algorithm.
    Genetic,
    /// Simulated annealing.
    SimulatedAnnealing,
    /// Particle swarm optimization.
    ParticleSwarm,
    /// Steepest-ascent hill climbing.
    HillClimbing,
    /// Tabu search.
    TabuSearch,
    /// Differential evolution.
    DifferentialEvolution,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Genetic => "genetic",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::ParticleSwarm => "particle_swarm",
            Algorithm::HillClimbing => "hill_climbing",
            Algorithm::TabuSearch => "tabu_search",
            Algorithm::DifferentialEvolution => "differential_evolution",
        };
        f.write_str(name)
    }
}

impl Algorithm {
    /// All six algorithms, in a stable order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Genetic,
        Algorithm::SimulatedAnnealing,
        Algorithm::ParticleSwarm,
        Algorithm::HillClimbing,
        Algorithm::TabuSearch,
        Algorithm::DifferentialEvolution,
    ];
}

/// Per-algorithm parameter bundle handed to the dispatcher.
///
/// # Examples
///
/// ```
/// use mixopt::classical::SolverParams;
///
/// let params = SolverParams::default().with_seed(42);
/// assert_eq!(params.ga.seed, Some(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverParams {
    /// Genetic algorithm parameters.
    pub ga: GaConfig,
    /// Simulated annealing parameters.
    pub sa: SaConfig,
    /// Particle swarm parameters.
    pub pso: PsoConfig,
    /// Hill climbing parameters.
    pub hill: HillConfig,
    /// Tabu search parameters.
    pub tabu: TabuConfig,
    /// Differential evolution parameters.
    pub de: DeConfig,
}

impl SolverParams {
    /// Reduced-budget preset for latency-sensitive callers.
    ///
    /// Smaller populations and far fewer iterations; the same
    /// selection/fallback machinery applies.
    pub fn realtime() -> Self {
        Self {
            ga: GaConfig::default()
                .with_population_size(20)
                .with_max_generations(30),
            sa: SaConfig::default().with_max_iterations(300),
            pso: PsoConfig::default()
                .with_swarm_size(15)
                .with_max_iterations(40),
            hill: HillConfig::default().with_max_iterations(60),
            tabu: TabuConfig::default()
                .with_max_iterations(80)
                .with_max_no_improve(25),
            de: DeConfig::default()
                .with_population_size(16)
                .with_max_generations(40),
        }
    }

    /// Applies one seed to every algorithm for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga = self.ga.with_seed(seed);
        self.sa = self.sa.with_seed(seed);
        self.pso = self.pso.with_seed(seed);
        self.hill = self.hill.with_seed(seed);
        self.tabu = self.tabu.with_seed(seed);
        self.de = self.de.with_seed(seed);
        self
    }
}

/// Dispatcher over the six metaheuristic runners.
///
/// Counts invocations so cache behavior can be asserted externally (a cache
/// hit must not increment the counter).
#[derive(Debug, Default)]
pub struct ClassicalSolver {
    invocations: AtomicUsize,
}

impl ClassicalSolver {
    /// Creates a solver with a zeroed invocation counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `optimize` calls performed so far.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Runs `algorithm` on `problem` and returns the best solution found
    /// within the iteration budget and optional deadline.
    ///
    /// The problem must already be validated; this call never fails for a
    /// well-formed problem.
    pub fn optimize(
        &self,
        problem: &OptimizationProblem,
        evaluator: &dyn ProblemEvaluator,
        algorithm: Algorithm,
        params: &SolverParams,
        deadline: Option<Instant>,
    ) -> OptimizationSolution {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        debug!(problem = %problem.id, %algorithm, "classical optimize");

        let space = SearchSpace::from_problem(problem);
        let eval = Evaluator::new(problem, &space, evaluator);
        let fitness = |g: &Genome| eval.fitness(g);

        let started = Instant::now();
        let run = match algorithm {
            Algorithm::Genetic => {
                let r = GaRunner::run_with_budget(&space, &fitness, &params.ga, deadline, None);
                RawRun {
                    best: r.best,
                    iterations: r.generations,
                    converged_at: r.converged_at,
                    fitness_history: r.fitness_history,
                    alternatives: r
                        .final_population
                        .into_iter()
                        .skip(1)
                        .take(3)
                        .map(|s| (s.genome, s.fitness))
                        .collect(),
                }
            }
            Algorithm::SimulatedAnnealing => {
                let r = SaRunner::run_with_budget(&space, &fitness, &params.sa, deadline, None);
                RawRun {
                    best: r.best,
                    iterations: r.iterations,
                    converged_at: None,
                    fitness_history: r.fitness_history,
                    alternatives: Vec::new(),
                }
            }
            Algorithm::ParticleSwarm => {
                let r = PsoRunner::run_with_budget(&space, &fitness, &params.pso, deadline, None);
                RawRun {
                    best: r.best,
                    iterations: r.iterations,
                    converged_at: None,
                    fitness_history: r.fitness_history,
                    alternatives: r.personal_bests.into_iter().skip(1).take(3).collect(),
                }
            }
            Algorithm::HillClimbing => {
                let r = HillRunner::run_with_budget(&space, &fitness, &params.hill, deadline, None);
                RawRun {
                    converged_at: r.local_optimum.then(|| r.iterations.saturating_sub(1)),
                    best: r.best,
                    iterations: r.iterations,
                    fitness_history: r.fitness_history,
                    alternatives: Vec::new(),
                }
            }
            Algorithm::TabuSearch => {
                let r = TabuRunner::run_with_budget(&space, &fitness, &params.tabu, deadline, None);
                RawRun {
                    best: r.best,
                    iterations: r.iterations,
                    converged_at: None,
                    fitness_history: r.fitness_history,
                    alternatives: Vec::new(),
                }
            }
            Algorithm::DifferentialEvolution => {
                let r = DeRunner::run_with_budget(&space, &fitness, &params.de, deadline, None);
                RawRun {
                    best: r.best,
                    iterations: r.generations,
                    converged_at: None,
                    fitness_history: r.fitness_history,
                    alternatives: r.final_population.into_iter().skip(1).take(3).collect(),
                }
            }
        };
        let elapsed = started.elapsed();

        let detail = eval.detail(&run.best);
        let confidence = confidence_from_history(&run.fitness_history);

        OptimizationSolution {
            problem_id: problem.id.clone(),
            assignment: space.decode(&run.best),
            objective_values: detail.objective_values,
            fitness: detail.fitness,
            feasible: detail.feasible,
            violations: detail.violations,
            confidence,
            alternatives: run
                .alternatives
                .into_iter()
                .map(|(genome, f)| RankedAssignment {
                    assignment: space.decode(&genome),
                    fitness: f,
                })
                .collect(),
            algorithm,
            execution: ExecutionMetrics {
                elapsed,
                iterations: run.iterations,
                fitness_history: run.fitness_history,
                converged_at: run.converged_at,
            },
            analysis: None,
        }
    }
}

struct RawRun {
    best: Genome,
    iterations: usize,
    converged_at: Option<usize>,
    fitness_history: Vec<f64>,
    alternatives: Vec<(Genome, f64)>,
}

/// Confidence in `[0, 1]` from how settled the fitness trajectory was at
/// termination: inverse coefficient of variation over the trailing window.
fn confidence_from_history(history: &[f64]) -> f64 {
    let tail = &history[history.len().saturating_sub(10)..];
    if tail.len() < 2 {
        return 0.5;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    if mean.abs() < f64::EPSILON {
        return if variance < f64::EPSILON { 1.0 } else { 0.5 };
    }
    (1.0 / (1.0 + variance.sqrt() / mean.abs())).clamp(0.0, 1.0)
}
