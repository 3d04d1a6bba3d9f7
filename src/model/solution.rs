//! Solution types returned by the classical library and the backend.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::analysis::SolutionAnalysis;
use crate::classical::Algorithm;

/// A concrete value assigned to one decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableValue {
    /// Continuous or discrete numeric value.
    Number(f64),
    /// Binary decision.
    Flag(bool),
    /// Chosen categorical option.
    Choice(String),
}

impl VariableValue {
    /// Numeric view of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(x) => Some(*x),
            VariableValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            VariableValue::Choice(_) => None,
        }
    }
}

/// An alternative assignment, ranked below the primary one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAssignment {
    /// Variable-name → value mapping.
    pub assignment: BTreeMap<String, VariableValue>,
    /// Fitness of this alternative.
    pub fitness: f64,
}

/// Runtime statistics for one solve invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Wall-clock time the run took.
    pub elapsed: Duration,
    /// Iterations (generations) executed.
    pub iterations: usize,
    /// Best fitness recorded at each iteration.
    pub fitness_history: Vec<f64>,
    /// Iteration at which convergence was first detected, if any.
    pub converged_at: Option<usize>,
}

/// A scored assignment of decision variables.
///
/// Created fresh per solve invocation. The back-reference to the problem is
/// by id, not by ownership, so the problem/solution graph stays acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSolution {
    /// Id of the problem this solution answers.
    pub problem_id: String,
    /// Variable-name → value mapping.
    pub assignment: BTreeMap<String, VariableValue>,
    /// Achieved value per objective, aligned with the problem's objective
    /// order.
    pub objective_values: Vec<f64>,
    /// Overall scalar fitness (higher is better).
    pub fitness: f64,
    /// Whether all constraints are satisfied within tolerance.
    pub feasible: bool,
    /// Measured violation magnitude per constraint, aligned with the
    /// problem's constraint order (0 when satisfied). May be empty for
    /// solutions produced outside the classical library.
    pub violations: Vec<f64>,
    /// Confidence in the result, in `[0, 1]`, derived from how settled the
    /// fitness trajectory was at termination.
    pub confidence: f64,
    /// Ranked alternative assignments, best first.
    pub alternatives: Vec<RankedAssignment>,
    /// Algorithm that produced this solution.
    pub algorithm: Algorithm,
    /// Runtime statistics.
    pub execution: ExecutionMetrics,
    /// Analyzer-attached report. `None` until the analyzer has run; the
    /// analyzer is the only writer after construction.
    pub analysis: Option<SolutionAnalysis>,
}

/// A backend solution with backend-specific metrics attached.
///
/// Owned exclusively by the call that produced it until handed to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumOptimizationSolution {
    /// The wrapped classical-shaped solution.
    pub solution: OptimizationSolution,
    /// Backend-predicted advantage over the classical path (1.0 = parity).
    pub predicted_advantage: f64,
    /// Backend-reported error rate in `[0, 1]`.
    pub error_rate: f64,
    /// Backend resource utilization in `[0, 1]`.
    pub resource_utilization: f64,
    /// When the backend produced the result.
    pub produced_at: SystemTime,
}
