//! Declarative problem description and structural validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tolerance for the objective-weight sum invariant (Σw = 1.0 ± this).
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-2;

/// The five problem families the engine accepts.
///
/// The engine depends only on the common problem shape; the family tag
/// drives strategy selection and evaluator lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// Which mix of campaign strategies to run.
    CampaignStrategy,
    /// How to split a budget or capacity across consumers.
    ResourceAllocation,
    /// Which prospects to contact first.
    ProspectPrioritization,
    /// How to weight delivery channels.
    ChannelOptimization,
    /// When to schedule touches.
    TimingOptimization,
}

/// Whether an objective's achieved value should go down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Lower achieved values are better.
    Minimize,
    /// Higher achieved values are better.
    Maximize,
}

/// One weighted objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Objective name, unique within a problem.
    pub name: String,
    /// Relative weight. All weights in a problem sum to 1.0.
    pub weight: f64,
    /// Target value the caller considers fully satisfied.
    pub target: f64,
    /// Optimization direction.
    pub direction: Direction,
}

/// Inequality or equality sense of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Measured value must be ≤ bound.
    LessEq,
    /// Measured value must be ≥ bound.
    GreaterEq,
    /// Measured value must equal the bound.
    Eq,
}

/// A soft constraint with a violation penalty.
///
/// Violations are not forbidden outright; they subtract
/// `penalty × violation` from fitness, so the search is steered toward
/// feasible regions without ruling out traversal through infeasible ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name, unique within a problem.
    pub name: String,
    /// Inequality/equality sense.
    pub kind: ConstraintKind,
    /// Numeric bound the measured value is compared against.
    pub bound: f64,
    /// Penalty per unit of violation. Must be strictly positive.
    pub penalty: f64,
}

/// Domain of a decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Real value in `[min, max]`.
    Continuous {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Integer value in `[min, max]`.
    Discrete {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// True/false decision.
    Binary,
    /// One of a fixed set of named options.
    Categorical {
        /// The allowed option labels. Must be non-empty.
        options: Vec<String>,
    },
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within a problem.
    pub name: String,
    /// Value domain.
    pub domain: Domain,
    /// Whether this variable belongs to the problem's weight vector.
    ///
    /// All weight variables together form a simplex: after every mutating
    /// operation their values are renormalized to sum to 1.0. Only
    /// continuous variables may carry this flag.
    pub is_weight: bool,
}

impl Variable {
    /// Continuous variable in `[min, max]`.
    pub fn continuous(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous { min, max },
            is_weight: false,
        }
    }

    /// Continuous weight-vector component in `[0, 1]`.
    pub fn weight(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous { min: 0.0, max: 1.0 },
            is_weight: true,
        }
    }

    /// Integer variable in `[min, max]`.
    pub fn discrete(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Discrete { min, max },
            is_weight: false,
        }
    }

    /// Binary variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Binary,
            is_weight: false,
        }
    }

    /// Categorical variable over the given options.
    pub fn categorical(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Categorical { options },
            is_weight: false,
        }
    }
}

/// Optional backend-facing problem properties.
///
/// Their presence biases strategy selection toward the quantum backend;
/// their contents are opaque to the classical library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantumHints {
    /// Estimated qubit count required to embed the problem.
    pub qubit_estimate: Option<usize>,
    /// Whether the problem maps naturally onto an annealing layout.
    pub annealing_friendly: bool,
}

/// A declarative, immutable optimization problem.
///
/// # Examples
///
/// ```
/// use mixopt::model::{
///     Direction, Objective, OptimizationProblem, ProblemKind, Variable,
/// };
///
/// let problem = OptimizationProblem::new("channel-mix-q3", ProblemKind::ChannelOptimization)
///     .with_objective(Objective {
///         name: "reach".into(),
///         weight: 1.0,
///         target: 10_000.0,
///         direction: Direction::Maximize,
///     })
///     .with_variable(Variable::weight("email"))
///     .with_variable(Variable::weight("social"));
///
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationProblem {
    /// Caller-assigned identity, unique per problem.
    pub id: String,
    /// Problem family.
    pub kind: ProblemKind,
    /// Ordered objectives. Weights sum to 1.0.
    pub objectives: Vec<Objective>,
    /// Soft constraints.
    pub constraints: Vec<Constraint>,
    /// Decision variables.
    pub variables: Vec<Variable>,
    /// Optional backend hints.
    pub quantum_hints: Option<QuantumHints>,
}

impl OptimizationProblem {
    /// Creates an empty problem shell; populate via the `with_*` builders.
    pub fn new(id: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            id: id.into(),
            kind,
            objectives: Vec::new(),
            constraints: Vec::new(),
            variables: Vec::new(),
            quantum_hints: None,
        }
    }

    /// Appends an objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    /// Appends a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a variable.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Sets backend hints.
    pub fn with_quantum_hints(mut self, hints: QuantumHints) -> Self {
        self.quantum_hints = Some(hints);
        self
    }

    /// Validates the problem's structural invariants.
    ///
    /// Checked before any algorithm runs:
    /// - id, objectives and variables are non-empty
    /// - objective weights sum to 1.0 (± [`WEIGHT_SUM_TOLERANCE`])
    /// - every constraint penalty is strictly positive
    /// - every variable's bounds are consistent with its domain kind
    /// - the weight flag only appears on continuous variables
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField { field: "id" });
        }
        if self.objectives.is_empty() {
            return Err(ValidationError::MissingField { field: "objectives" });
        }
        if self.variables.is_empty() {
            return Err(ValidationError::MissingField { field: "variables" });
        }

        let sum: f64 = self.objectives.iter().map(|o| o.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ValidationError::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        for c in &self.constraints {
            if c.penalty <= 0.0 {
                return Err(ValidationError::NonPositivePenalty {
                    name: c.name.clone(),
                    penalty: c.penalty,
                });
            }
        }

        for v in &self.variables {
            match &v.domain {
                Domain::Continuous { min, max } => {
                    if !min.is_finite() || !max.is_finite() || min >= max {
                        return Err(ValidationError::InconsistentBounds {
                            name: v.name.clone(),
                            detail: format!("continuous range [{min}, {max}] is empty"),
                        });
                    }
                }
                Domain::Discrete { min, max } => {
                    if min > max {
                        return Err(ValidationError::InconsistentBounds {
                            name: v.name.clone(),
                            detail: format!("discrete range [{min}, {max}] is empty"),
                        });
                    }
                }
                Domain::Binary => {}
                Domain::Categorical { options } => {
                    if options.is_empty() {
                        return Err(ValidationError::InconsistentBounds {
                            name: v.name.clone(),
                            detail: "categorical variable has no options".into(),
                        });
                    }
                }
            }
            if v.is_weight && !matches!(v.domain, Domain::Continuous { .. }) {
                return Err(ValidationError::InconsistentBounds {
                    name: v.name.clone(),
                    detail: "weight flag requires a continuous domain".into(),
                });
            }
        }

        Ok(())
    }

    /// Structural fingerprint used as the cache key.
    ///
    /// Derived from the id plus the problem's shape (kind and element
    /// counts), so a resubmitted identical problem hits the cache while a
    /// restructured one under the same id does not.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}:{:?}:v{}:o{}:c{}",
            self.id,
            self.kind,
            self.variables.len(),
            self.objectives.len(),
            self.constraints.len(),
        )
    }

    /// Heuristic complexity score driving strategy selection.
    ///
    /// `variables × objectives + 10 × constraints`, plus a flat bonus when
    /// backend-specific hints are present.
    pub fn complexity_score(&self) -> usize {
        let base = self.variables.len() * self.objectives.len() + 10 * self.constraints.len();
        if self.quantum_hints.is_some() {
            base + 50
        } else {
            base
        }
    }

    /// Indices of the weight-vector variables.
    pub fn weight_variable_indices(&self) -> Vec<usize> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_weight)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_problem() -> OptimizationProblem {
        OptimizationProblem::new("p1", ProblemKind::CampaignStrategy)
            .with_objective(Objective {
                name: "conversion".into(),
                weight: 0.6,
                target: 100.0,
                direction: Direction::Maximize,
            })
            .with_objective(Objective {
                name: "cost".into(),
                weight: 0.4,
                target: 50.0,
                direction: Direction::Minimize,
            })
            .with_variable(Variable::continuous("spend", 0.0, 1000.0))
            .with_variable(Variable::discrete("touches", 1, 10))
    }

    #[test]
    fn test_valid_problem() {
        assert!(base_problem().validate().is_ok());
    }

    #[test]
    fn test_weight_sum_within_tolerance() {
        let mut p = base_problem();
        p.objectives[0].weight = 0.605; // sum = 1.005, inside ±1e-2
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_weight_sum_violation() {
        let mut p = base_problem();
        p.objectives[0].weight = 0.9;
        assert!(matches!(
            p.validate(),
            Err(ValidationError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_missing_fields() {
        let p = OptimizationProblem::new("", ProblemKind::TimingOptimization);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::MissingField { field: "id" })
        ));

        let p = OptimizationProblem::new("p", ProblemKind::TimingOptimization);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::MissingField { field: "objectives" })
        ));
    }

    #[test]
    fn test_non_positive_penalty() {
        let p = base_problem().with_constraint(Constraint {
            name: "budget".into(),
            kind: ConstraintKind::LessEq,
            bound: 500.0,
            penalty: 0.0,
        });
        assert!(matches!(
            p.validate(),
            Err(ValidationError::NonPositivePenalty { .. })
        ));
    }

    #[test]
    fn test_inconsistent_bounds() {
        let p = base_problem().with_variable(Variable::continuous("bad", 5.0, 5.0));
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InconsistentBounds { .. })
        ));

        let p = base_problem().with_variable(Variable::categorical("empty", vec![]));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_weight_flag_requires_continuous() {
        let mut v = Variable::binary("flag");
        v.is_weight = true;
        let p = base_problem().with_variable(v);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InconsistentBounds { .. })
        ));
    }

    #[test]
    fn test_fingerprint_reflects_structure() {
        let a = base_problem();
        let b = base_problem().with_variable(Variable::binary("extra"));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), base_problem().fingerprint());
    }

    #[test]
    fn test_complexity_score() {
        let p = base_problem(); // 2 vars × 2 objectives
        assert_eq!(p.complexity_score(), 4);

        let p = p.with_constraint(Constraint {
            name: "c".into(),
            kind: ConstraintKind::LessEq,
            bound: 1.0,
            penalty: 1.0,
        });
        assert_eq!(p.complexity_score(), 14);

        let p = p.with_quantum_hints(QuantumHints::default());
        assert_eq!(p.complexity_score(), 64);
    }

    #[test]
    fn test_weight_variable_indices() {
        let p = base_problem()
            .with_variable(Variable::weight("w0"))
            .with_variable(Variable::weight("w1"));
        assert_eq!(p.weight_variable_indices(), vec![2, 3]);
    }
}
