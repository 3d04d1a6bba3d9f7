//! Criterion benchmarks for the mixopt solvers and engine.
//!
//! Uses a synthetic channel-mix problem (linear objectives over a weight
//! simplex) to measure solver overhead independent of any real campaign
//! data.

use std::collections::BTreeMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mixopt::classical::{Algorithm, ClassicalSolver, SolverParams};
use mixopt::engine::{EngineConfig, OptimizationEngine};
use mixopt::fitness::ProblemEvaluator;
use mixopt::model::{
    Direction, Objective, OptimizationProblem, ProblemKind, Variable, VariableValue,
};

// ===========================================================================
// Synthetic channel-mix problem
// ===========================================================================

struct LinearMixEvaluator;

impl ProblemEvaluator for LinearMixEvaluator {
    fn objective_values(
        &self,
        problem: &OptimizationProblem,
        assignment: &BTreeMap<String, VariableValue>,
    ) -> Vec<f64> {
        let weights: Vec<f64> = problem
            .variables
            .iter()
            .map(|v| {
                assignment
                    .get(&v.name)
                    .and_then(VariableValue::as_number)
                    .unwrap_or(0.0)
            })
            .collect();
        problem
            .objectives
            .iter()
            .enumerate()
            .map(|(o, _)| {
                weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| w * ((i + o + 1) as f64 / 10.0))
                    .sum()
            })
            .collect()
    }
}

fn channel_problem(channels: usize) -> OptimizationProblem {
    let mut p = OptimizationProblem::new("bench", ProblemKind::ChannelOptimization)
        .with_objective(Objective {
            name: "conversion".into(),
            weight: 0.5,
            target: 1.0,
            direction: Direction::Maximize,
        })
        .with_objective(Objective {
            name: "engagement".into(),
            weight: 0.3,
            target: 1.0,
            direction: Direction::Maximize,
        })
        .with_objective(Objective {
            name: "cost".into(),
            weight: 0.2,
            target: 1.0,
            direction: Direction::Minimize,
        });
    for i in 0..channels {
        p = p.with_variable(Variable::weight(format!("channel{i}")));
    }
    p
}

// ===========================================================================
// Solver benchmarks
// ===========================================================================

fn bench_algorithms(c: &mut Criterion) {
    let problem = channel_problem(8);
    let solver = ClassicalSolver::new();
    let params = SolverParams::realtime().with_seed(42);

    let mut group = c.benchmark_group("classical");
    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &algorithm,
            |b, &algorithm| {
                b.iter(|| {
                    black_box(solver.optimize(
                        black_box(&problem),
                        &LinearMixEvaluator,
                        algorithm,
                        &params,
                        None,
                    ))
                })
            },
        );
    }
    group.finish();
}

fn bench_problem_sizes(c: &mut Criterion) {
    let solver = ClassicalSolver::new();
    let params = SolverParams::realtime().with_seed(42);

    let mut group = c.benchmark_group("ga_channels");
    for channels in [4, 16, 64] {
        let problem = channel_problem(channels);
        group.bench_with_input(
            BenchmarkId::from_parameter(channels),
            &problem,
            |b, problem| {
                b.iter(|| {
                    black_box(solver.optimize(
                        black_box(problem),
                        &LinearMixEvaluator,
                        Algorithm::Genetic,
                        &params,
                        None,
                    ))
                })
            },
        );
    }
    group.finish();
}

// ===========================================================================
// Engine benchmarks
// ===========================================================================

fn bench_engine(c: &mut Criterion) {
    let config = EngineConfig {
        solver_params: SolverParams::realtime().with_seed(42),
        ..EngineConfig::default()
    };
    let engine = OptimizationEngine::new(config).with_evaluator(
        ProblemKind::ChannelOptimization,
        Arc::new(LinearMixEvaluator),
    );
    let problem = channel_problem(8);

    // First submit populates the cache; the benchmark then measures the
    // cached path.
    engine.submit(&problem).unwrap();
    c.bench_function("engine_cached_submit", |b| {
        b.iter(|| black_box(engine.submit(black_box(&problem)).unwrap()))
    });
}

criterion_group!(benches, bench_algorithms, bench_problem_sizes, bench_engine);
criterion_main!(benches);
