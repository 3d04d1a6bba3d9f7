//! Solution quality assessment.

use serde::{Deserialize, Serialize};

use crate::fitness::{satisfaction, tolerance_band};
use crate::model::{OptimizationProblem, OptimizationSolution};

/// How far a constraint violation exceeds its tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// No measurable violation.
    None,
    /// Violation within one tolerance band.
    Minor,
    /// Violation within three tolerance bands.
    Moderate,
    /// Violation beyond three tolerance bands.
    Severe,
}

impl ViolationSeverity {
    /// Classifies a violation against a tolerance band.
    pub fn classify(violation: f64, band: f64) -> Self {
        if violation <= 1e-12 {
            ViolationSeverity::None
        } else if violation <= band {
            ViolationSeverity::Minor
        } else if violation <= 3.0 * band {
            ViolationSeverity::Moderate
        } else {
            ViolationSeverity::Severe
        }
    }
}

/// Per-objective satisfaction detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSatisfaction {
    /// Objective name.
    pub name: String,
    /// Objective weight.
    pub weight: f64,
    /// Achieved value.
    pub achieved: f64,
    /// Target value.
    pub target: f64,
    /// Satisfaction in `[0, 1]` (achieved/target, direction-aware, clamped).
    pub satisfaction: f64,
}

/// Per-constraint violation detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Constraint name.
    pub name: String,
    /// Violation magnitude (0 when satisfied).
    pub violation: f64,
    /// Severity class.
    pub severity: ViolationSeverity,
}

/// Quality axis of a solution analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Per-objective satisfaction, in objective order.
    pub objectives: Vec<ObjectiveSatisfaction>,
    /// Per-constraint violations, in constraint order.
    pub constraints: Vec<ConstraintViolation>,
    /// Fraction of constraints satisfied within tolerance.
    pub feasibility: f64,
    /// Weighted objective satisfaction in `[0, 1]`.
    pub optimality: f64,
    /// How close the ranked alternatives sit to the best solution.
    pub robustness: f64,
    /// Combined quality score in `[0, 1]`.
    pub overall: f64,
}

/// Scores a solution's quality against its problem.
pub fn assess_quality(
    problem: &OptimizationProblem,
    solution: &OptimizationSolution,
) -> QualityReport {
    let objectives: Vec<ObjectiveSatisfaction> = problem
        .objectives
        .iter()
        .zip(&solution.objective_values)
        .map(|(objective, &achieved)| ObjectiveSatisfaction {
            name: objective.name.clone(),
            weight: objective.weight,
            achieved,
            target: objective.target,
            satisfaction: satisfaction(objective, achieved),
        })
        .collect();

    let optimality: f64 = objectives
        .iter()
        .map(|o| o.weight * o.satisfaction)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let constraints: Vec<ConstraintViolation> = problem
        .constraints
        .iter()
        .enumerate()
        .map(|(i, constraint)| {
            let band = tolerance_band(constraint);
            let violation = solution
                .violations
                .get(i)
                .copied()
                .unwrap_or_else(|| fallback_violation(solution, band));
            ConstraintViolation {
                name: constraint.name.clone(),
                violation,
                severity: ViolationSeverity::classify(violation, band),
            }
        })
        .collect();

    let feasibility = if constraints.is_empty() {
        1.0
    } else {
        let ok = constraints
            .iter()
            .filter(|c| {
                matches!(
                    c.severity,
                    ViolationSeverity::None | ViolationSeverity::Minor
                )
            })
            .count();
        ok as f64 / constraints.len() as f64
    };

    let robustness = robustness_score(solution);

    let overall = 0.4 * optimality + 0.4 * feasibility + 0.2 * robustness;

    QualityReport {
        objectives,
        constraints,
        feasibility,
        optimality,
        robustness,
        overall,
    }
}

/// Violation magnitude for a constraint the solution carries no
/// measurement for (backend-produced solutions may omit them): zero when
/// the solution is feasible, well past the tolerance band otherwise.
fn fallback_violation(solution: &OptimizationSolution, band: f64) -> f64 {
    if solution.feasible {
        0.0
    } else {
        4.0 * band
    }
}

/// Robustness from the spread between the best solution and its ranked
/// alternatives: tight alternatives mean the optimum sits on a plateau
/// rather than a knife edge.
fn robustness_score(solution: &OptimizationSolution) -> f64 {
    if solution.alternatives.is_empty() {
        return 0.5;
    }
    let mean_alt = solution
        .alternatives
        .iter()
        .map(|a| a.fitness)
        .sum::<f64>()
        / solution.alternatives.len() as f64;
    1.0 / (1.0 + (solution.fitness - mean_alt).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classical::Algorithm;
    use crate::model::{
        Constraint, ConstraintKind, Direction, ExecutionMetrics, Objective, ProblemKind,
        Variable,
    };
    use crate::model::{OptimizationProblem, RankedAssignment};
    use std::collections::BTreeMap;

    fn problem() -> OptimizationProblem {
        OptimizationProblem::new("q", ProblemKind::CampaignStrategy)
            .with_objective(Objective {
                name: "conv".into(),
                weight: 0.7,
                target: 100.0,
                direction: Direction::Maximize,
            })
            .with_objective(Objective {
                name: "cost".into(),
                weight: 0.3,
                target: 10.0,
                direction: Direction::Minimize,
            })
            .with_variable(Variable::continuous("x", 0.0, 1.0))
            .with_constraint(Constraint {
                name: "cap".into(),
                kind: ConstraintKind::LessEq,
                bound: 100.0,
                penalty: 1.0,
            })
    }

    fn solution(feasible: bool) -> OptimizationSolution {
        OptimizationSolution {
            problem_id: "q".into(),
            assignment: BTreeMap::new(),
            objective_values: vec![80.0, 5.0],
            fitness: 0.86,
            feasible,
            violations: vec![],
            confidence: 0.9,
            alternatives: vec![RankedAssignment {
                assignment: BTreeMap::new(),
                fitness: 0.8,
            }],
            algorithm: Algorithm::Genetic,
            execution: ExecutionMetrics::default(),
            analysis: None,
        }
    }

    #[test]
    fn test_severity_classification() {
        assert_eq!(ViolationSeverity::classify(0.0, 1.0), ViolationSeverity::None);
        assert_eq!(ViolationSeverity::classify(0.5, 1.0), ViolationSeverity::Minor);
        assert_eq!(
            ViolationSeverity::classify(2.0, 1.0),
            ViolationSeverity::Moderate
        );
        assert_eq!(
            ViolationSeverity::classify(5.0, 1.0),
            ViolationSeverity::Severe
        );
    }

    #[test]
    fn test_quality_weighted_satisfaction() {
        let report = assess_quality(&problem(), &solution(true));
        // conv: 80/100 = 0.8 at weight 0.7; cost: 5 ≤ 10 → 1.0 at weight 0.3
        assert!((report.optimality - (0.7 * 0.8 + 0.3)).abs() < 1e-12);
        assert_eq!(report.feasibility, 1.0);
        assert!(report.overall > 0.0 && report.overall <= 1.0);
    }

    #[test]
    fn test_infeasible_solution_lowers_feasibility() {
        let feasible = assess_quality(&problem(), &solution(true));
        let infeasible = assess_quality(&problem(), &solution(false));
        assert!(infeasible.feasibility < feasible.feasibility);
    }

    // Measured magnitudes, not the feasibility flag, drive severity: the
    // "cap" constraint's band is 5.0 (5% of the 100.0 bound).
    #[test]
    fn test_measured_violations_classify_by_band() {
        let mut s = solution(false);

        s.violations = vec![3.0];
        let report = assess_quality(&problem(), &s);
        assert_eq!(report.constraints[0].severity, ViolationSeverity::Minor);

        s.violations = vec![12.0];
        let report = assess_quality(&problem(), &s);
        assert_eq!(report.constraints[0].severity, ViolationSeverity::Moderate);

        s.violations = vec![20.0];
        let report = assess_quality(&problem(), &s);
        assert_eq!(report.constraints[0].severity, ViolationSeverity::Severe);
    }

    // A violation just past a small band must land in the middle of the
    // scale, not collapse to severe.
    #[test]
    fn test_small_band_moderate_violation() {
        let p = OptimizationProblem::new("q2", ProblemKind::CampaignStrategy)
            .with_objective(Objective {
                name: "conv".into(),
                weight: 1.0,
                target: 100.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::continuous("x", 0.0, 1.0))
            .with_constraint(Constraint {
                name: "ratio".into(),
                kind: ConstraintKind::LessEq,
                bound: 0.9,
                penalty: 1.0,
            });
        // Band is 0.045; a 0.1 violation sits between 1× and 3× the band.
        let mut s = solution(false);
        s.objective_values = vec![80.0];
        s.violations = vec![0.1];
        let report = assess_quality(&p, &s);
        assert_eq!(report.constraints[0].severity, ViolationSeverity::Moderate);
    }

    #[test]
    fn test_robustness_tight_alternatives() {
        let mut s = solution(true);
        s.alternatives[0].fitness = s.fitness;
        let tight = assess_quality(&problem(), &s);
        s.alternatives[0].fitness = s.fitness - 10.0;
        let loose = assess_quality(&problem(), &s);
        assert!(tight.robustness > loose.robustness);
    }
}
