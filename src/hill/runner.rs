//! Hill climbing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::HillConfig;
use crate::encoding::{Genome, SearchSpace};

/// Result of a hill-climbing run.
#[derive(Debug, Clone)]
pub struct HillResult {
    /// The local optimum reached.
    pub best: Genome,

    /// Fitness of the local optimum.
    pub best_fitness: f64,

    /// Total iterations executed.
    pub iterations: usize,

    /// Whether the run ended because no neighbor improved (a local
    /// optimum), as opposed to hitting the iteration cap.
    pub local_optimum: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Best fitness at the end of each iteration.
    pub fitness_history: Vec<f64>,
}

/// Steepest-ascent hill climbing.
///
/// At each iteration the full generated neighborhood is evaluated and the
/// best improving neighbor taken; the run stops at the first iteration with
/// no improvement. It can stall at a local optimum — no escape mechanism is
/// included. Restarts, if desired, are the caller's responsibility.
pub struct HillRunner;

impl HillRunner {
    /// Runs hill climbing.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`HillConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &HillConfig) -> HillResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs hill climbing with an optional deadline and cancellation token,
    /// both checked once per iteration.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &HillConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> HillResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid HillConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = space.sample(&mut rng);
        let mut current_fitness = fitness(&current);

        let mut fitness_history = vec![current_fitness];
        let mut iterations = 0usize;
        let mut local_optimum = false;
        let mut cancelled = false;
        let mut timed_out = false;

        for _ in 0..config.max_iterations {
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

            let neighborhood =
                space.neighborhood(&current, &mut rng, config.neighborhood_scale);

            let mut best_neighbor: Option<(Genome, f64)> = None;
            for mv in neighborhood {
                let f = fitness(&mv.genome);
                if f > current_fitness
                    && best_neighbor.as_ref().is_none_or(|(_, bf)| f > *bf)
                {
                    best_neighbor = Some((mv.genome, f));
                }
            }

            iterations += 1;
            match best_neighbor {
                Some((genome, f)) => {
                    current = genome;
                    current_fitness = f;
                    fitness_history.push(current_fitness);
                }
                None => {
                    // No improving neighbor: a local optimum by this
                    // neighborhood's definition.
                    local_optimum = true;
                    fitness_history.push(current_fitness);
                    break;
                }
            }
        }

        HillResult {
            best: current,
            best_fitness: current_fitness,
            iterations,
            local_optimum,
            cancelled,
            timed_out,
            fitness_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Objective, OptimizationProblem, ProblemKind, Variable};

    fn discrete_space() -> SearchSpace {
        let p = OptimizationProblem::new("hill", ProblemKind::ResourceAllocation)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::discrete("x", -20, 20))
            .with_variable(Variable::discrete("y", -20, 20));
        SearchSpace::from_problem(&p)
    }

    /// Unimodal landscape peaking at (5, -3).
    fn ridge(genome: &Genome) -> f64 {
        -((genome[0] - 5.0).abs() + (genome[1] + 3.0).abs())
    }

    #[test]
    fn test_hill_climbs_to_unimodal_peak() {
        let config = HillConfig::default().with_max_iterations(200).with_seed(42);
        let result = HillRunner::run(&discrete_space(), &ridge, &config);
        assert_eq!(result.best, vec![5.0, -3.0]);
        assert!(result.local_optimum);
    }

    #[test]
    fn test_hill_stops_at_first_non_improving_iteration() {
        // Flat landscape: nothing improves, so exactly one iteration runs.
        let flat = |_: &Genome| 0.0;
        let config = HillConfig::default().with_max_iterations(100).with_seed(1);
        let result = HillRunner::run(&discrete_space(), &flat, &config);
        assert_eq!(result.iterations, 1);
        assert!(result.local_optimum);
    }

    #[test]
    fn test_hill_history_strictly_improves_until_stall() {
        let config = HillConfig::default().with_max_iterations(200).with_seed(7);
        let result = HillRunner::run(&discrete_space(), &ridge, &config);
        let len = result.fitness_history.len();
        // Every step except the terminal stall strictly improves.
        for window in result.fitness_history[..len - 1].windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn test_hill_iteration_cap() {
        let config = HillConfig::default().with_max_iterations(3).with_seed(3);
        let result = HillRunner::run(&discrete_space(), &ridge, &config);
        assert!(result.iterations <= 3);
    }
}
