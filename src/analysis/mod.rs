//! Solution analysis: quality, performance and convergence scoring plus
//! actionable recommendations.
//!
//! The [`SolutionAnalyzer`] keeps a rolling per-(problem kind, algorithm)
//! history of past runs so performance scores and algorithm rankings are
//! relative to what this process has actually observed, not absolute
//! thresholds.

mod convergence;
mod performance;
mod quality;

pub use convergence::{assess_convergence, ConvergenceReport};
pub use performance::{assess_performance, PerformanceReport, RunSample};
pub use quality::{
    assess_quality, ConstraintViolation, ObjectiveSatisfaction, QualityReport, ViolationSeverity,
};

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classical::Algorithm;
use crate::model::{OptimizationProblem, OptimizationSolution, ProblemKind};

/// Runs remembered per (problem kind, algorithm) pair.
const HISTORY_CAPACITY: usize = 100;

/// Quality score below which a parameter-tuning recommendation fires.
const TUNE_THRESHOLD: f64 = 0.6;

/// Efficiency score below which an algorithm switch is recommended.
const SWITCH_THRESHOLD: f64 = 0.35;

/// Feasibility below which constraint relaxation is recommended.
const RELAX_THRESHOLD: f64 = 0.5;

/// Full analysis attached to a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionAnalysis {
    /// Quality axis.
    pub quality: QualityReport,
    /// Performance axis.
    pub performance: PerformanceReport,
    /// Convergence axis.
    pub convergence: ConvergenceReport,
    /// Combined score: `0.5·quality + 0.3·efficiency + 0.2·stability`.
    pub overall_score: f64,
    /// Actionable recommendations, most urgent first.
    pub recommendations: Vec<Recommendation>,
    /// Algorithms ranked by observed mean fitness for this problem kind.
    pub algorithm_ranking: Vec<AlgorithmRank>,
}

/// One entry of the per-kind algorithm ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRank {
    /// Ranked algorithm.
    pub algorithm: Algorithm,
    /// Mean fitness over remembered runs.
    pub mean_fitness: f64,
    /// Number of remembered runs backing the estimate.
    pub runs: usize,
}

/// Actionable advice derived from the three analysis axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Quality is low but the search behaved sanely; parameters are the
    /// first lever to pull.
    TuneParameters {
        /// Why tuning is suggested.
        reason: String,
    },
    /// The algorithm is underperforming its peers or the hardware.
    SwitchAlgorithm {
        /// Suggested replacement, when the ranking has one.
        suggested: Option<Algorithm>,
        /// Why switching is suggested.
        reason: String,
    },
    /// The feasible region is too tight to satisfy.
    RelaxConstraints {
        /// Why relaxation is suggested.
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct RunRecord {
    fitness: f64,
    elapsed: Duration,
    memory: usize,
}

/// Stateful analyzer with a rolling run history.
#[derive(Debug, Default)]
pub struct SolutionAnalyzer {
    history: Mutex<HashMap<(ProblemKind, Algorithm), VecDeque<RunRecord>>>,
}

impl SolutionAnalyzer {
    /// Creates an analyzer with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes a solution and attaches the result to it.
    ///
    /// The run is recorded into the rolling history after scoring, so the
    /// performance baseline never includes the run being scored.
    pub fn analyze(&self, problem: &OptimizationProblem, solution: &mut OptimizationSolution) {
        let key = (problem.kind, solution.algorithm);

        let samples: Vec<RunSample> = {
            let history = self.history.lock().expect("analysis history poisoned");
            history
                .get(&key)
                .map(|runs| {
                    runs.iter()
                        .map(|r| RunSample {
                            elapsed: r.elapsed,
                            memory: r.memory,
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        let quality = assess_quality(problem, solution);
        let convergence = assess_convergence(
            &solution.execution.fitness_history,
            solution.execution.converged_at,
        );
        let performance = assess_performance(solution, &samples, convergence.rate);

        let overall_score = 0.5 * quality.overall
            + 0.3 * performance.efficiency
            + 0.2 * convergence.stability;

        let algorithm_ranking = self.rank_algorithms(problem.kind);
        let recommendations = recommend(
            &quality,
            &performance,
            &convergence,
            solution.algorithm,
            &algorithm_ranking,
        );

        debug!(
            problem_id = %solution.problem_id,
            overall_score,
            recommendations = recommendations.len(),
            "solution analyzed"
        );

        self.record(key, solution, performance.memory_estimate);

        solution.analysis = Some(SolutionAnalysis {
            quality,
            performance,
            convergence,
            overall_score,
            recommendations,
            algorithm_ranking,
        });
    }

    /// Mean fitness per algorithm for a problem kind, best first.
    pub fn rank_algorithms(&self, kind: ProblemKind) -> Vec<AlgorithmRank> {
        let history = self.history.lock().expect("analysis history poisoned");
        let mut ranking: Vec<AlgorithmRank> = Algorithm::ALL
            .iter()
            .filter_map(|&algorithm| {
                let runs = history.get(&(kind, algorithm))?;
                if runs.is_empty() {
                    return None;
                }
                let mean_fitness =
                    runs.iter().map(|r| r.fitness).sum::<f64>() / runs.len() as f64;
                Some(AlgorithmRank {
                    algorithm,
                    mean_fitness,
                    runs: runs.len(),
                })
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.mean_fitness
                .partial_cmp(&a.mean_fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranking
    }

    fn record(&self, key: (ProblemKind, Algorithm), solution: &OptimizationSolution, memory: usize) {
        let mut history = self.history.lock().expect("analysis history poisoned");
        let runs = history.entry(key).or_default();
        if runs.len() >= HISTORY_CAPACITY {
            runs.pop_front();
        }
        runs.push_back(RunRecord {
            fitness: solution.fitness,
            elapsed: solution.execution.elapsed,
            memory,
        });
    }
}

/// Derives recommendations from the three axes, in priority order:
/// infeasibility first, then algorithm fit, then parameter tuning.
fn recommend(
    quality: &QualityReport,
    performance: &PerformanceReport,
    convergence: &ConvergenceReport,
    current: Algorithm,
    ranking: &[AlgorithmRank],
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if quality.feasibility < RELAX_THRESHOLD {
        out.push(Recommendation::RelaxConstraints {
            reason: format!(
                "only {:.0}% of constraints satisfied within tolerance",
                quality.feasibility * 100.0
            ),
        });
    }

    let better_peer = ranking
        .iter()
        .find(|r| r.algorithm != current)
        .filter(|r| {
            ranking
                .iter()
                .find(|c| c.algorithm == current)
                .map_or(true, |c| r.mean_fitness > c.mean_fitness)
        });
    if performance.efficiency < SWITCH_THRESHOLD {
        out.push(Recommendation::SwitchAlgorithm {
            suggested: better_peer.map(|r| r.algorithm),
            reason: format!(
                "solve ran at {:.2} relative efficiency against its own history",
                performance.efficiency
            ),
        });
    }

    if quality.overall < TUNE_THRESHOLD {
        let reason = if convergence.plateau {
            "search plateaued below the quality bar; widen exploration parameters".to_string()
        } else if convergence.oscillating {
            "search oscillated without settling; reduce step sizes or add damping".to_string()
        } else {
            format!(
                "quality score {:.2} below target; increase iteration or population budget",
                quality.overall
            )
        };
        out.push(Recommendation::TuneParameters { reason });
    }

    out
}
