//! PSO execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::PsoConfig;
use crate::encoding::{Genome, SearchSpace};

/// Result of a Particle Swarm Optimization run.
#[derive(Debug, Clone)]
pub struct PsoResult {
    /// The global-best genome.
    pub best: Genome,

    /// Fitness of the global best.
    pub best_fitness: f64,

    /// Total iterations executed.
    pub iterations: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped at its deadline.
    pub timed_out: bool,

    /// Global-best fitness at the end of each iteration.
    pub fitness_history: Vec<f64>,

    /// Final personal bests, sorted by descending fitness.
    pub personal_bests: Vec<(Genome, f64)>,
}

struct Particle {
    position: Genome,
    velocity: Vec<f64>,
    best_position: Genome,
    best_fitness: f64,
}

/// Executes Particle Swarm Optimization.
///
/// Each particle carries a position, a velocity and a personal best. The
/// velocity update combines inertia, a cognitive pull toward the personal
/// best and a social pull toward the global best, clamped per dimension;
/// positions are clamped back into the variable domain (and the weight
/// simplex renormalized) after every step.
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`PsoConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<F>(space: &SearchSpace, fitness: &F, config: &PsoConfig) -> PsoResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        Self::run_with_budget(space, fitness, config, None, None)
    }

    /// Runs PSO with an optional deadline and cancellation token, both
    /// checked once per iteration.
    pub fn run_with_budget<F>(
        space: &SearchSpace,
        fitness: &F,
        config: &PsoConfig,
        deadline: Option<Instant>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> PsoResult
    where
        F: Fn(&Genome) -> f64 + Sync,
    {
        config.validate().expect("invalid PsoConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let dims = space.len();
        let velocity_bounds: Vec<f64> = (0..dims)
            .map(|i| config.max_velocity * space.slot_range(i))
            .collect();

        // Initialize swarm
        let mut swarm: Vec<Particle> = (0..config.swarm_size)
            .map(|_| {
                let position = space.sample(&mut rng);
                let velocity = velocity_bounds
                    .iter()
                    .map(|&b| rng.random_range(-b..b))
                    .collect();
                let f = fitness(&position);
                Particle {
                    best_position: position.clone(),
                    best_fitness: f,
                    position,
                    velocity,
                }
            })
            .collect();

        let mut global_best = swarm[0].best_position.clone();
        let mut global_best_fitness = swarm[0].best_fitness;
        for p in &swarm[1..] {
            if p.best_fitness > global_best_fitness {
                global_best = p.best_position.clone();
                global_best_fitness = p.best_fitness;
            }
        }

        let mut fitness_history = Vec::with_capacity(config.max_iterations + 1);
        fitness_history.push(global_best_fitness);

        let mut iterations = 0usize;
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

            for particle in &mut swarm {
                for d in 0..dims {
                    let r1: f64 = rng.random_range(0.0..1.0);
                    let r2: f64 = rng.random_range(0.0..1.0);
                    let cognitive = config.cognitive
                        * r1
                        * (particle.best_position[d] - particle.position[d]);
                    let social = config.social * r2 * (global_best[d] - particle.position[d]);
                    let v = config.inertia * particle.velocity[d] + cognitive + social;
                    particle.velocity[d] = v.clamp(-velocity_bounds[d], velocity_bounds[d]);
                    particle.position[d] += particle.velocity[d];
                }
                space.clamp(&mut particle.position);

                let f = fitness(&particle.position);
                if f > particle.best_fitness {
                    particle.best_position = particle.position.clone();
                    particle.best_fitness = f;
                    if f > global_best_fitness {
                        global_best = particle.position.clone();
                        global_best_fitness = f;
                    }
                }
            }

            iterations += 1;
            fitness_history.push(global_best_fitness);
        }

        let mut personal_bests: Vec<(Genome, f64)> = swarm
            .into_iter()
            .map(|p| (p.best_position, p.best_fitness))
            .collect();
        personal_bests.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        PsoResult {
            best: global_best,
            best_fitness: global_best_fitness,
            iterations,
            cancelled,
            timed_out,
            fitness_history,
            personal_bests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, Objective, OptimizationProblem, ProblemKind, Variable};

    fn continuous_space() -> SearchSpace {
        let p = OptimizationProblem::new("pso", ProblemKind::ProspectPrioritization)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::continuous("x", -5.0, 5.0))
            .with_variable(Variable::continuous("y", -5.0, 5.0))
            .with_variable(Variable::continuous("z", -5.0, 5.0));
        SearchSpace::from_problem(&p)
    }

    fn sphere(genome: &Genome) -> f64 {
        -genome.iter().map(|x| x * x).sum::<f64>()
    }

    #[test]
    fn test_pso_approaches_origin() {
        let config = PsoConfig::default().with_max_iterations(150).with_seed(42);
        let result = PsoRunner::run(&continuous_space(), &sphere, &config);
        assert!(result.best_fitness > -0.1, "got {}", result.best_fitness);
    }

    #[test]
    fn test_global_best_non_decreasing() {
        let config = PsoConfig::default().with_max_iterations(80).with_seed(2);
        let result = PsoRunner::run(&continuous_space(), &sphere, &config);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0] - 1e-12);
        }
    }

    #[test]
    fn test_weight_simplex_preserved_each_step() {
        let p = OptimizationProblem::new("pso-w", ProblemKind::ChannelOptimization)
            .with_objective(Objective {
                name: "o".into(),
                weight: 1.0,
                target: 1.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::weight("a"))
            .with_variable(Variable::weight("b"))
            .with_variable(Variable::weight("c"))
            .with_variable(Variable::weight("d"));
        let space = SearchSpace::from_problem(&p);
        let fitness = |g: &Genome| g[0] - g[1];
        let config = PsoConfig::default().with_max_iterations(50).with_seed(11);
        let result = PsoRunner::run(&space, &fitness, &config);

        let sum: f64 = result.best.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        for (genome, _) in &result.personal_bests {
            let sum: f64 = genome.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pso_deadline() {
        let config = PsoConfig::default().with_seed(5);
        let deadline = Some(Instant::now() - std::time::Duration::from_millis(1));
        let result =
            PsoRunner::run_with_budget(&continuous_space(), &sphere, &config, deadline, None);
        assert!(result.timed_out);
        assert_eq!(result.iterations, 0);
    }
}
