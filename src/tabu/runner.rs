//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Generate an initial solution
//! 2. At each iteration:
//!    a. Generate the neighborhood with move keys
//!    b. Select the best non-tabu move (or a tabu move that sets a new
//!       global best — the aspiration criterion)
//!    c. Apply the move, push its key onto the FIFO tabu list
//!    d. Update the global best if improved
//! 3. Terminate after the iteration cap or stagnation
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3).

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::TabuConfig;
use crate::encoding::{Genome, SearchSpace};

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best genome found.
    pub best: Genome,

    /// Fitness of the best genome.
    pub best_fitness: f64,

    /// Total iterations executed.
    pub iterations: usize,

    /// Iteration at which the best solution was found.
    pub best_iteration: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Best fitness at the end of each iteration.
    pub fitness_history: Vec<f64>,
}

/// A scored candidate move.
#[derive(Debug, Clone)]
pub struct ScoredMove {
    /// The resulting genome.
    pub genome: Genome,
    /// Move key for tabu tracking.
    pub key: String,
    /// Fitness of the resulting genome.
    pub fitness: f64,
}

/// Picks the admissible move with the highest fitness.
///
/// A move is admissible when its key is not tabu, or — with `aspiration`
/// enabled — when taking it would set a new global best. When every move is
/// tabu and none aspires, the least-bad move is taken anyway so the search
/// cannot wedge.
pub fn select_move(
    moves: &[ScoredMove],
    tabu: &HashSet<String>,
    best_fitness: f64,
    aspiration: bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, mv) in moves.iter().enumerate() {
        if tabu.contains(&mv.key) && !(aspiration && mv.fitness > best_fitness) {
            continue;
        }
        if best.is_none_or(|b| mv.fitness > moves[b].fitness) {
            best = Some(i);
        }
    }
    if best.is_some() {
        return best;
    }
    // All moves tabu, none aspires: fall back to the least bad.
    (0..moves.len()).max_by(|&a, &b| {
        moves[a]
            .fitness
            .partial_cmp(&moves[b].fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`TabuConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &TabuConfig) -> TabuResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs Tabu Search with an optional deadline and cancellation token,
    /// both checked once per iteration.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &TabuConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TabuResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid TabuConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = space.sample(&mut rng);
        let mut best = current.clone();
        let mut best_fitness = fitness(&current);
        let mut best_iteration = 0;

        // Tabu list: FIFO queue of move keys with a set for O(1) lookup.
        let mut tabu_queue: VecDeque<String> = VecDeque::new();
        let mut tabu_set: HashSet<String> = HashSet::new();

        let mut fitness_history = Vec::with_capacity(config.max_iterations);
        let mut no_improve_count = 0;
        let mut iterations = 0;
        let mut cancelled = false;
        let mut timed_out = false;

        for iteration in 0..config.max_iterations {
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

            let moves: Vec<ScoredMove> = space
                .neighborhood(&current, &mut rng, config.neighborhood_scale)
                .into_iter()
                .map(|mv| {
                    let f = fitness(&mv.genome);
                    ScoredMove {
                        genome: mv.genome,
                        key: mv.key,
                        fitness: f,
                    }
                })
                .collect();
            iterations = iteration + 1;

            if moves.is_empty() {
                fitness_history.push(best_fitness);
                break;
            }

            let chosen = select_move(&moves, &tabu_set, best_fitness, config.aspiration)
                .expect("non-empty neighborhood always yields a move");
            let mv = &moves[chosen];

            // Update tabu list
            if tabu_queue.len() >= config.tabu_tenure {
                if let Some(old_key) = tabu_queue.pop_front() {
                    tabu_set.remove(&old_key);
                }
            }
            tabu_queue.push_back(mv.key.clone());
            tabu_set.insert(mv.key.clone());

            current = mv.genome.clone();

            if mv.fitness > best_fitness {
                best = current.clone();
                best_fitness = mv.fitness;
                best_iteration = iteration;
                no_improve_count = 0;
            } else {
                no_improve_count += 1;
            }

            fitness_history.push(best_fitness);

            if no_improve_count >= config.max_no_improve {
                break;
            }
        }

        TabuResult {
            best,
            best_fitness,
            iterations,
            best_iteration,
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
        let p = OptimizationProblem::new("tabu", ProblemKind::CampaignStrategy)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::discrete("x", -50, 50));
        SearchSpace::from_problem(&p)
    }

    /// Peak at x = 5.
    fn quadratic(genome: &Genome) -> f64 {
        -(genome[0] - 5.0).powi(2)
    }

    fn scored(key: &str, fitness: f64) -> ScoredMove {
        ScoredMove {
            genome: vec![],
            key: key.into(),
            fitness,
        }
    }

    #[test]
    fn test_select_move_skips_tabu() {
        let moves = vec![scored("a", 3.0), scored("b", 2.0), scored("c", 1.0)];
        let tabu: HashSet<String> = ["a".to_string(), "b".to_string(), "x".to_string()]
            .into_iter()
            .collect();
        // Best global fitness well above every move: aspiration never fires,
        // so the only admissible move is "c" despite being the worst.
        let chosen = select_move(&moves, &tabu, 10.0, true).unwrap();
        assert_eq!(moves[chosen].key, "c");
    }

    #[test]
    fn test_select_move_aspiration_overrides_tabu() {
        // Planted improving tabu move: "a" is tabu but beats the global best.
        let moves = vec![scored("a", 11.0), scored("b", 2.0), scored("c", 1.0)];
        let tabu: HashSet<String> = ["a".to_string(), "b".to_string(), "x".to_string()]
            .into_iter()
            .collect();
        let chosen = select_move(&moves, &tabu, 10.0, true).unwrap();
        assert_eq!(moves[chosen].key, "a");

        // Without aspiration the same move stays forbidden.
        let chosen = select_move(&moves, &tabu, 10.0, false).unwrap();
        assert_eq!(moves[chosen].key, "c");
    }

    #[test]
    fn test_select_move_all_tabu_picks_least_bad() {
        let moves = vec![scored("a", -5.0), scored("b", -1.0)];
        let tabu: HashSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        let chosen = select_move(&moves, &tabu, 10.0, true).unwrap();
        assert_eq!(moves[chosen].key, "b");
    }

    #[test]
    fn test_tabu_finds_quadratic_peak() {
        let config = TabuConfig::default()
            .with_max_iterations(300)
            .with_tabu_tenure(3)
            .with_seed(42);
        let result = TabuRunner::run(&discrete_space(), &quadratic, &config);
        assert_eq!(result.best, vec![5.0]);
        assert!(result.best_fitness.abs() < 1e-10);
    }

    #[test]
    fn test_tabu_history_non_decreasing() {
        let config = TabuConfig::default().with_max_iterations(100).with_seed(7);
        let result = TabuRunner::run(&discrete_space(), &quadratic, &config);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0] - 1e-12);
        }
    }

    #[test]
    fn test_tabu_stagnation_termination() {
        let config = TabuConfig::default()
            .with_max_iterations(10_000)
            .with_max_no_improve(20)
            .with_seed(42);
        let result = TabuRunner::run(&discrete_space(), &quadratic, &config);
        assert!(result.iterations < 10_000);
        assert!(result.best_iteration < result.iterations);
    }
}
