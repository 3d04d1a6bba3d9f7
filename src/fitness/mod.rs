//! Pluggable fitness evaluation.
//!
//! The true objective function is problem-domain-specific: callers register
//! a [`ProblemEvaluator`] per problem kind. The crate supplies only the
//! combiner — direction-aware objective satisfaction weighted by objective
//! weight, minus penalty-scaled constraint violations — never a business
//! formula.
//!
//! Fitness is a scalar the algorithms seek to **maximize**.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::encoding::{Genome, SearchSpace};
use crate::model::{
    Constraint, ConstraintKind, Direction, Objective, OptimizationProblem, VariableValue,
};

/// Domain-specific measurement of objectives and constraints.
///
/// Implementations compute, for a decoded assignment, the achieved value of
/// each objective and the measured value of each constraint, in the
/// problem's declaration order. They must not apply weights or penalties;
/// the engine's combiner does that.
pub trait ProblemEvaluator: Send + Sync {
    /// Achieved value per objective, aligned with `problem.objectives`.
    fn objective_values(
        &self,
        problem: &OptimizationProblem,
        assignment: &BTreeMap<String, VariableValue>,
    ) -> Vec<f64>;

    /// Measured value per constraint, aligned with `problem.constraints`.
    ///
    /// The default returns no measurements, which the combiner treats as
    /// all constraints satisfied.
    fn constraint_values(
        &self,
        _problem: &OptimizationProblem,
        _assignment: &BTreeMap<String, VariableValue>,
    ) -> Vec<f64> {
        Vec::new()
    }
}

/// Satisfaction of one objective in `[0, 1]`, direction-aware.
///
/// A maximized objective is fully satisfied at or above its target; a
/// minimized one at or below it. Partial credit is the achieved/target
/// ratio (or its inverse for minimization).
pub fn satisfaction(objective: &Objective, achieved: f64) -> f64 {
    match objective.direction {
        Direction::Maximize => {
            if objective.target.abs() <= f64::EPSILON {
                return if achieved >= objective.target { 1.0 } else { 0.0 };
            }
            (achieved / objective.target).clamp(0.0, 1.0)
        }
        Direction::Minimize => {
            if achieved <= objective.target {
                return 1.0;
            }
            if achieved.abs() <= f64::EPSILON {
                return 1.0;
            }
            (objective.target / achieved).clamp(0.0, 1.0)
        }
    }
}

/// Signed excess of a measured value past a constraint's bound (≥ 0).
pub fn violation(constraint: &Constraint, value: f64) -> f64 {
    match constraint.kind {
        ConstraintKind::LessEq => (value - constraint.bound).max(0.0),
        ConstraintKind::GreaterEq => (constraint.bound - value).max(0.0),
        ConstraintKind::Eq => (value - constraint.bound).abs(),
    }
}

/// Tolerance band within which a violation still counts as feasible.
///
/// 5% of the bound's magnitude, floored at 1e-6 for zero bounds. The
/// analyzer classifies violation severity in multiples of this band.
pub fn tolerance_band(constraint: &Constraint) -> f64 {
    (0.05 * constraint.bound.abs()).max(1e-6)
}

/// Full evaluation of one genome.
#[derive(Debug, Clone)]
pub struct EvaluationDetail {
    /// Achieved value per objective.
    pub objective_values: Vec<f64>,
    /// Violation per constraint (0 when satisfied).
    pub violations: Vec<f64>,
    /// Combined scalar fitness (higher is better).
    pub fitness: f64,
    /// Whether every violation lies within its tolerance band.
    pub feasible: bool,
}

/// Combines a [`ProblemEvaluator`] with the penalty scheme and counts
/// evaluations.
///
/// The evaluation counter backs the cache and differential-evolution
/// instrumentation tests; it is shared across threads via an atomic so
/// parallel population evaluation counts correctly.
pub struct Evaluator<'a> {
    problem: &'a OptimizationProblem,
    space: &'a SearchSpace,
    inner: &'a dyn ProblemEvaluator,
    evaluations: AtomicUsize,
}

impl<'a> Evaluator<'a> {
    /// Wraps a domain evaluator for one problem/space pair.
    pub fn new(
        problem: &'a OptimizationProblem,
        space: &'a SearchSpace,
        inner: &'a dyn ProblemEvaluator,
    ) -> Self {
        Self {
            problem,
            space,
            inner,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Scalar fitness of a genome (higher is better).
    pub fn fitness(&self, genome: &Genome) -> f64 {
        self.detail(genome).fitness
    }

    /// Full evaluation of a genome.
    pub fn detail(&self, genome: &Genome) -> EvaluationDetail {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        let assignment = self.space.decode(genome);
        let objective_values = self.inner.objective_values(self.problem, &assignment);
        let constraint_values = self.inner.constraint_values(self.problem, &assignment);

        let mut fitness = 0.0;
        for (objective, &achieved) in self.problem.objectives.iter().zip(&objective_values) {
            fitness += objective.weight * satisfaction(objective, achieved);
        }

        let mut feasible = true;
        let mut violations = Vec::with_capacity(self.problem.constraints.len());
        for (constraint, &value) in self.problem.constraints.iter().zip(&constraint_values) {
            let v = violation(constraint, value);
            if v > tolerance_band(constraint) {
                feasible = false;
            }
            fitness -= constraint.penalty * v;
            violations.push(v);
        }
        // Unmeasured constraints are treated as satisfied.
        violations.resize(self.problem.constraints.len(), 0.0);

        EvaluationDetail {
            objective_values,
            violations,
            fitness,
            feasible,
        }
    }

    /// Number of evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProblemKind, Variable};

    struct SumEvaluator;

    impl ProblemEvaluator for SumEvaluator {
        fn objective_values(
            &self,
            _problem: &OptimizationProblem,
            assignment: &BTreeMap<String, VariableValue>,
        ) -> Vec<f64> {
            let total: f64 = assignment.values().filter_map(|v| v.as_number()).sum();
            vec![total]
        }

        fn constraint_values(
            &self,
            problem: &OptimizationProblem,
            assignment: &BTreeMap<String, VariableValue>,
        ) -> Vec<f64> {
            let total: f64 = assignment.values().filter_map(|v| v.as_number()).sum();
            problem.constraints.iter().map(|_| total).collect()
        }
    }

    fn problem() -> OptimizationProblem {
        OptimizationProblem::new("f", ProblemKind::ResourceAllocation)
            .with_objective(Objective {
                name: "value".into(),
                weight: 1.0,
                target: 10.0,
                direction: Direction::Maximize,
            })
            .with_variable(Variable::continuous("x", 0.0, 10.0))
            .with_variable(Variable::continuous("y", 0.0, 10.0))
    }

    #[test]
    fn test_satisfaction_maximize() {
        let obj = Objective {
            name: "o".into(),
            weight: 1.0,
            target: 100.0,
            direction: Direction::Maximize,
        };
        assert_eq!(satisfaction(&obj, 150.0), 1.0);
        assert_eq!(satisfaction(&obj, 50.0), 0.5);
        assert_eq!(satisfaction(&obj, -5.0), 0.0);
    }

    #[test]
    fn test_satisfaction_minimize() {
        let obj = Objective {
            name: "o".into(),
            weight: 1.0,
            target: 10.0,
            direction: Direction::Minimize,
        };
        assert_eq!(satisfaction(&obj, 5.0), 1.0);
        assert_eq!(satisfaction(&obj, 20.0), 0.5);
    }

    #[test]
    fn test_violation_kinds() {
        let c = |kind| Constraint {
            name: "c".into(),
            kind,
            bound: 10.0,
            penalty: 1.0,
        };
        assert_eq!(violation(&c(ConstraintKind::LessEq), 12.0), 2.0);
        assert_eq!(violation(&c(ConstraintKind::LessEq), 8.0), 0.0);
        assert_eq!(violation(&c(ConstraintKind::GreaterEq), 8.0), 2.0);
        assert_eq!(violation(&c(ConstraintKind::Eq), 7.0), 3.0);
    }

    #[test]
    fn test_evaluator_combines_and_counts() {
        let p = problem();
        let space = SearchSpace::from_problem(&p);
        let evaluator = Evaluator::new(&p, &space, &SumEvaluator);

        // x + y = 6 → satisfaction 0.6
        let detail = evaluator.detail(&vec![2.0, 4.0]);
        assert!((detail.fitness - 0.6).abs() < 1e-12);
        assert!(detail.feasible);
        assert_eq!(evaluator.evaluations(), 1);

        evaluator.fitness(&vec![1.0, 1.0]);
        assert_eq!(evaluator.evaluations(), 2);
    }

    #[test]
    fn test_penalty_subtracts_and_flags_infeasible() {
        let p = problem().with_constraint(Constraint {
            name: "cap".into(),
            kind: ConstraintKind::LessEq,
            bound: 5.0,
            penalty: 2.0,
        });
        let space = SearchSpace::from_problem(&p);
        let evaluator = Evaluator::new(&p, &space, &SumEvaluator);

        // x + y = 8 violates cap by 3 → fitness = 0.8 − 2·3
        let detail = evaluator.detail(&vec![4.0, 4.0]);
        assert!(!detail.feasible);
        assert!((detail.fitness - (0.8 - 6.0)).abs() < 1e-12);
        assert_eq!(detail.violations, vec![3.0]);
    }
}
