//! Problem and solution data model.
//!
//! The shared vocabulary between callers, the metaheuristic library, the
//! orchestration engine and the analyzer: [`OptimizationProblem`] describes
//! what to optimize (objectives, constraints, decision variables) and
//! [`OptimizationSolution`] describes a scored, feasible assignment.
//!
//! Problems are immutable once submitted for solving. Solutions are created
//! fresh per solve invocation; after being returned, only the analyzer
//! attaches derived metrics to them.

mod problem;
mod solution;

pub use problem::{
    Constraint, ConstraintKind, Direction, Domain, Objective, OptimizationProblem, ProblemKind,
    QuantumHints, Variable, WEIGHT_SUM_TOLERANCE,
};
pub use solution::{
    ExecutionMetrics, OptimizationSolution, QuantumOptimizationSolution, RankedAssignment,
    VariableValue,
};
