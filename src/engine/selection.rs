//! Strategy and algorithm selection heuristics.

use serde::{Deserialize, Serialize};

use crate::backend::BackendStrategy;
use crate::classical::Algorithm;
use crate::model::{OptimizationProblem, ProblemKind};

/// Hard cap on the predicted advantage ratio.
const MAX_ADVANTAGE: f64 = 2.0;

/// Outcome of strategy selection for one problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyDecision {
    /// Chosen execution style.
    pub strategy: BackendStrategy,
    /// Problem complexity score at decision time.
    pub complexity: usize,
    /// Predicted backend advantage ratio (1.0 = parity).
    pub predicted_advantage: f64,
}

/// Predicted backend advantage ratio for a problem.
///
/// Additive bonuses for the structural traits backends historically help
/// with: many variables, multiple objectives, a favorable problem family
/// and explicit backend hints. Capped at 2.0.
pub fn predicted_advantage(problem: &OptimizationProblem) -> f64 {
    let mut advantage: f64 = 1.0;
    if problem.variables.len() > 20 {
        advantage += 0.3;
    }
    if problem.objectives.len() > 2 {
        advantage += 0.2;
    }
    if matches!(
        problem.kind,
        ProblemKind::CampaignStrategy | ProblemKind::ResourceAllocation
    ) {
        advantage += 0.3;
    }
    if problem.quantum_hints.is_some() {
        advantage += 0.2;
    }
    advantage.min(MAX_ADVANTAGE)
}

/// Picks a strategy from complexity and predicted advantage.
///
/// High-complexity problems with a meaningful predicted advantage anneal;
/// channel and timing problems approximate; everything else explores.
pub fn select_strategy(
    problem: &OptimizationProblem,
    complexity_threshold: usize,
    advantage_threshold: f64,
) -> StrategyDecision {
    let complexity = problem.complexity_score();
    let advantage = predicted_advantage(problem);

    let strategy = if complexity > complexity_threshold && advantage > advantage_threshold {
        BackendStrategy::Annealing
    } else if matches!(
        problem.kind,
        ProblemKind::ChannelOptimization | ProblemKind::TimingOptimization
    ) {
        BackendStrategy::Approximation
    } else {
        BackendStrategy::Exploration
    };

    StrategyDecision {
        strategy,
        complexity,
        predicted_advantage: advantage,
    }
}

/// Classical algorithm that realizes each strategy when the backend is
/// unavailable or skipped.
pub fn algorithm_for(strategy: BackendStrategy) -> Algorithm {
    match strategy {
        BackendStrategy::Annealing => Algorithm::SimulatedAnnealing,
        BackendStrategy::Approximation => Algorithm::Genetic,
        BackendStrategy::Exploration => Algorithm::ParticleSwarm,
    }
}
