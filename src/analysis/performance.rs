//! Solution performance assessment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{ExecutionMetrics, OptimizationSolution};

/// Weight of the time component in the efficiency blend.
const TIME_WEIGHT: f64 = 0.5;

/// Weight of the memory component in the efficiency blend.
const MEMORY_WEIGHT: f64 = 0.2;

/// Weight of the convergence-rate component in the efficiency blend.
const CONVERGENCE_WEIGHT: f64 = 0.3;

/// One remembered run, the baseline performance is scored against.
#[derive(Debug, Clone, Copy)]
pub struct RunSample {
    /// Wall time of the run.
    pub elapsed: Duration,
    /// Estimated working-set size of the run in bytes.
    pub memory: usize,
}

/// Performance axis of a solution analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Wall time of the solve.
    pub execution_time: Duration,
    /// Iterations actually executed.
    pub iterations: usize,
    /// Estimated peak working-set size in bytes.
    pub memory_estimate: usize,
    /// Blend of relative time, relative memory and convergence rate, in
    /// `[0, 1]`. Time and memory score `0.5` with no history.
    pub efficiency: f64,
}

/// Scores a solve against a rolling history of prior runs for the same
/// problem kind and algorithm.
///
/// `convergence_rate` is the fraction of progress already banked when the
/// run stopped; a search that front-loads its improvement used its budget
/// efficiently.
pub fn assess_performance(
    solution: &OptimizationSolution,
    history: &[RunSample],
    convergence_rate: f64,
) -> PerformanceReport {
    let execution = &solution.execution;
    let memory_estimate = memory_estimate(execution);

    let time_score = relative_score(
        execution.elapsed.as_secs_f64(),
        history.iter().map(|s| s.elapsed.as_secs_f64()),
        history.len(),
    );
    let memory_score = relative_score(
        memory_estimate as f64,
        history.iter().map(|s| s.memory as f64),
        history.len(),
    );

    let efficiency = TIME_WEIGHT * time_score
        + MEMORY_WEIGHT * memory_score
        + CONVERGENCE_WEIGHT * convergence_rate.clamp(0.0, 1.0);

    PerformanceReport {
        execution_time: execution.elapsed,
        iterations: execution.iterations,
        memory_estimate,
        efficiency,
    }
}

/// Rough working-set estimate: the fitness history plus the assignment, a
/// few machine words each. Intentionally coarse; used only for relative
/// comparisons between runs.
fn memory_estimate(execution: &ExecutionMetrics) -> usize {
    let history = execution.fitness_history.len() * std::mem::size_of::<f64>();
    let per_iteration = execution.iterations * 2 * std::mem::size_of::<f64>();
    history + per_iteration
}

/// Position of a value against the historical mean: `0.5` at parity,
/// toward `1.0` when cheaper than the mean, toward `0` when dearer.
fn relative_score(value: f64, history: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.5;
    }
    let mean = history.sum::<f64>() / len as f64;
    if mean <= 0.0 {
        return 0.5;
    }
    1.0 / (1.0 + value / mean)
}
