//! Error types for the optimization engine.
//!
//! Validation failures are rejected before any algorithm runs and are never
//! silently coerced. Execution failures are caught at the orchestration
//! boundary; the engine alone decides whether to fall back or propagate.
//! All errors implement `std::error::Error` via `thiserror`.

use std::time::Duration;

use crate::model::ProblemKind;

/// A problem that failed structural validation.
///
/// Raised by [`OptimizationProblem::validate`](crate::model::OptimizationProblem::validate)
/// before any computation begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Objective weights must sum to 1.0 within a small tolerance.
    #[error("objective weights sum to {sum:.4}, expected 1.0 (±{tolerance})")]
    WeightSum {
        /// Actual sum of the objective weights.
        sum: f64,
        /// Allowed deviation from 1.0.
        tolerance: f64,
    },

    /// Every constraint must carry a strictly positive violation penalty.
    #[error("constraint '{name}' has non-positive penalty {penalty}")]
    NonPositivePenalty {
        /// Name of the offending constraint.
        name: String,
        /// The invalid penalty value.
        penalty: f64,
    },

    /// A variable's bounds are inconsistent with its domain kind.
    #[error("variable '{name}' has inconsistent bounds: {detail}")]
    InconsistentBounds {
        /// Name of the offending variable.
        name: String,
        /// Human-readable explanation.
        detail: String,
    },

    /// A required field is missing or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
}

/// Primary error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The caller submitted a malformed problem.
    #[error("invalid problem: {0}")]
    Invalid(#[from] ValidationError),

    /// The quantum backend reported a failure.
    ///
    /// When fallback is disabled this propagates verbatim to the caller.
    #[error("backend '{backend}' failed: {reason}")]
    Backend {
        /// Name of the backend that failed.
        backend: String,
        /// Backend-supplied failure description.
        reason: String,
    },

    /// The solve exceeded its configured wall-clock budget.
    ///
    /// Treated exactly like a backend failure by the fallback machinery.
    #[error("solve timed out after {0:?}")]
    Timeout(Duration),

    /// No fitness evaluator is registered for the problem's kind.
    ///
    /// The objective function is domain-specific and must be supplied by
    /// the caller; the engine refuses to guess one.
    #[error("no evaluator registered for problem kind {0:?}")]
    NoEvaluator(ProblemKind),
}
