//! Opaque quantum-backend contract.
//!
//! The backend's internal physics is not modeled here; it is a pluggable
//! alternate strategy with the same problem-in / solution-out shape as the
//! classical library. The engine never trusts [`QuantumBackend::execute`]
//! to succeed and always wraps it in the fallback path; the classical core
//! stays correct and testable whether or not a backend exists.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{OptimizationProblem, QuantumOptimizationSolution};

/// Backend execution style chosen by strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStrategy {
    /// Annealing-style search for high-complexity problems with a
    /// predicted backend advantage.
    Annealing,
    /// Approximation-style search for structured channel/timing problems.
    Approximation,
    /// Exploration-style search; the default.
    Exploration,
}

impl std::fmt::Display for BackendStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendStrategy::Annealing => "annealing",
            BackendStrategy::Approximation => "approximation",
            BackendStrategy::Exploration => "exploration",
        };
        f.write_str(name)
    }
}

/// Configuration handed to the backend per execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Execution style.
    pub strategy: BackendStrategy,
    /// Sampling shots the backend should take.
    pub shots: usize,
    /// Wall-clock budget for this execution.
    pub time_limit: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            strategy: BackendStrategy::Exploration,
            shots: 1_000,
            time_limit: Duration::from_secs(30),
        }
    }
}

/// An external optimization backend.
///
/// `execute` may fail or hang; the engine enforces the time limit and
/// routes failures through the fallback path.
pub trait QuantumBackend: Send + Sync {
    /// Human-readable backend name, used in error and event payloads.
    fn name(&self) -> &str;

    /// Runs one optimization on the backend.
    fn execute(
        &self,
        problem: &OptimizationProblem,
        config: &BackendConfig,
    ) -> Result<QuantumOptimizationSolution, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(BackendStrategy::Annealing.to_string(), "annealing");
        assert_eq!(BackendStrategy::Exploration.to_string(), "exploration");
    }

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.strategy, BackendStrategy::Exploration);
        assert_eq!(config.shots, 1_000);
    }
}
