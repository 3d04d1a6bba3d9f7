//! Genome encoding shared by all six metaheuristics.
//!
//! [`SearchSpace`] flattens a problem's decision variables into a vector of
//! `f64` slots (a genome): continuous values map directly, discrete and
//! binary values are stored rounded, categorical options are stored as an
//! option index. All algorithms operate on genomes and funnel every mutating
//! operation through [`SearchSpace::clamp`], which restores domain bounds
//! and renormalizes the weight simplex, so the sum-to-1 invariant holds
//! after mutation, crossover, velocity updates and differential mutation
//! alike.

use std::collections::BTreeMap;

use rand::Rng;

use crate::model::{Domain, OptimizationProblem, VariableValue};

/// A flattened candidate solution.
pub type Genome = Vec<f64>;

/// One neighbor of a genome, tagged with a move key for tabu tracking.
///
/// Moves with the same key are considered equivalent (e.g. two successive
/// "increase spend" steps).
#[derive(Debug, Clone)]
pub struct NeighborMove {
    /// The resulting genome after applying this move.
    pub genome: Genome,
    /// A string key identifying this move.
    pub key: String,
}

#[derive(Debug, Clone)]
enum SlotKind {
    Continuous { lo: f64, hi: f64 },
    Discrete { lo: f64, hi: f64 },
    Binary,
    Categorical { options: Vec<String> },
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    kind: SlotKind,
}

/// Flattened view of a problem's variables.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    slots: Vec<Slot>,
    weight_slots: Vec<usize>,
}

impl SearchSpace {
    /// Builds the search space for a validated problem.
    pub fn from_problem(problem: &OptimizationProblem) -> Self {
        let slots = problem
            .variables
            .iter()
            .map(|v| Slot {
                name: v.name.clone(),
                kind: match &v.domain {
                    Domain::Continuous { min, max } => SlotKind::Continuous { lo: *min, hi: *max },
                    Domain::Discrete { min, max } => SlotKind::Discrete {
                        lo: *min as f64,
                        hi: *max as f64,
                    },
                    Domain::Binary => SlotKind::Binary,
                    Domain::Categorical { options } => SlotKind::Categorical {
                        options: options.clone(),
                    },
                },
            })
            .collect();
        Self {
            slots,
            weight_slots: problem.weight_variable_indices(),
        }
    }

    /// Number of genome slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the space has no variables.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the space contains a weight vector.
    pub fn has_weights(&self) -> bool {
        !self.weight_slots.is_empty()
    }

    /// Samples a random valid genome.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Genome {
        let mut genome: Genome = self
            .slots
            .iter()
            .map(|slot| match &slot.kind {
                SlotKind::Continuous { lo, hi } => rng.random_range(*lo..*hi),
                SlotKind::Discrete { lo, hi } => rng.random_range(*lo..=*hi).round(),
                SlotKind::Binary => {
                    if rng.random_bool(0.5) {
                        1.0
                    } else {
                        0.0
                    }
                }
                SlotKind::Categorical { options } => rng.random_range(0..options.len()) as f64,
            })
            .collect();
        self.renormalize_weights(&mut genome);
        genome
    }

    /// Restores every slot to its domain and renormalizes the weight vector.
    ///
    /// Weight renormalization takes precedence over per-variable bounds:
    /// the simplex invariant is the stronger contract.
    pub fn clamp(&self, genome: &mut Genome) {
        for (value, slot) in genome.iter_mut().zip(&self.slots) {
            match &slot.kind {
                SlotKind::Continuous { lo, hi } => *value = value.clamp(*lo, *hi),
                SlotKind::Discrete { lo, hi } => *value = value.clamp(*lo, *hi).round(),
                SlotKind::Binary => *value = if *value >= 0.5 { 1.0 } else { 0.0 },
                SlotKind::Categorical { options } => {
                    *value = value.clamp(0.0, (options.len() - 1) as f64).round()
                }
            }
        }
        self.renormalize_weights(genome);
    }

    /// Renormalizes the weight slots so their components sum to 1.0.
    ///
    /// Negative components are clamped to zero first. When the total is
    /// (numerically) zero the weights are reset to uniform.
    pub fn renormalize_weights(&self, genome: &mut Genome) {
        if self.weight_slots.is_empty() {
            return;
        }
        let mut sum = 0.0;
        for &i in &self.weight_slots {
            genome[i] = genome[i].max(0.0);
            sum += genome[i];
        }
        if sum <= f64::EPSILON {
            let uniform = 1.0 / self.weight_slots.len() as f64;
            for &i in &self.weight_slots {
                genome[i] = uniform;
            }
        } else {
            for &i in &self.weight_slots {
                genome[i] /= sum;
            }
        }
    }

    /// Produces one random neighbor by perturbing a single slot.
    ///
    /// `scale` controls continuous step size as a fraction of the slot's
    /// range.
    pub fn neighbor<R: Rng>(&self, genome: &Genome, rng: &mut R, scale: f64) -> Genome {
        let mut out = genome.clone();
        let idx = rng.random_range(0..self.slots.len());
        self.perturb(&mut out, idx, rng, scale);
        self.clamp(&mut out);
        out
    }

    /// Enumerates a deterministic neighborhood: one step in each direction
    /// per slot, keyed for tabu tracking.
    pub fn neighborhood<R: Rng>(
        &self,
        genome: &Genome,
        rng: &mut R,
        scale: f64,
    ) -> Vec<NeighborMove> {
        let mut moves = Vec::with_capacity(self.slots.len() * 2);
        for (idx, slot) in self.slots.iter().enumerate() {
            match &slot.kind {
                SlotKind::Continuous { lo, hi } => {
                    let step = scale * (hi - lo);
                    for (sign, tag) in [(1.0, "+"), (-1.0, "-")] {
                        let mut g = genome.clone();
                        g[idx] += sign * step;
                        self.clamp(&mut g);
                        moves.push(NeighborMove {
                            genome: g,
                            key: format!("{}{}", slot.name, tag),
                        });
                    }
                }
                SlotKind::Discrete { .. } => {
                    for (delta, tag) in [(1.0, "+"), (-1.0, "-")] {
                        let mut g = genome.clone();
                        g[idx] += delta;
                        self.clamp(&mut g);
                        moves.push(NeighborMove {
                            genome: g,
                            key: format!("{}{}", slot.name, tag),
                        });
                    }
                }
                SlotKind::Binary => {
                    let mut g = genome.clone();
                    g[idx] = 1.0 - g[idx];
                    self.clamp(&mut g);
                    moves.push(NeighborMove {
                        genome: g,
                        key: format!("flip:{}", slot.name),
                    });
                }
                SlotKind::Categorical { options } => {
                    if options.len() > 1 {
                        let current = genome[idx] as usize;
                        let mut next = rng.random_range(0..options.len() - 1);
                        if next >= current {
                            next += 1;
                        }
                        let mut g = genome.clone();
                        g[idx] = next as f64;
                        self.clamp(&mut g);
                        moves.push(NeighborMove {
                            genome: g,
                            key: format!("{}={}", slot.name, options[next]),
                        });
                    }
                }
            }
        }
        moves
    }

    /// Mutates a genome in place: each slot is perturbed with probability
    /// `rate`, then the genome is clamped.
    pub fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R, rate: f64, scale: f64) {
        let rate = rate.clamp(0.0, 1.0);
        for idx in 0..self.slots.len() {
            if rng.random_bool(rate) {
                self.perturb(genome, idx, rng, scale);
            }
        }
        self.clamp(genome);
    }

    /// Width of a slot's value range, used to scale velocities and steps.
    ///
    /// Binary and categorical slots report their index span.
    pub fn slot_range(&self, idx: usize) -> f64 {
        match &self.slots[idx].kind {
            SlotKind::Continuous { lo, hi } | SlotKind::Discrete { lo, hi } => hi - lo,
            SlotKind::Binary => 1.0,
            SlotKind::Categorical { options } => (options.len() - 1).max(1) as f64,
        }
    }

    /// Perturbs one slot in place without clamping.
    fn perturb<R: Rng>(&self, genome: &mut Genome, idx: usize, rng: &mut R, scale: f64) {
        match &self.slots[idx].kind {
            SlotKind::Continuous { lo, hi } => {
                let step = scale * (hi - lo);
                genome[idx] += rng.random_range(-step..step);
            }
            SlotKind::Discrete { .. } => {
                genome[idx] += if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            }
            SlotKind::Binary => genome[idx] = 1.0 - genome[idx],
            SlotKind::Categorical { options } => {
                genome[idx] = rng.random_range(0..options.len()) as f64;
            }
        }
    }

    /// Decodes a genome into a variable-name → value assignment.
    pub fn decode(&self, genome: &Genome) -> BTreeMap<String, VariableValue> {
        self.slots
            .iter()
            .zip(genome)
            .map(|(slot, &value)| {
                let decoded = match &slot.kind {
                    SlotKind::Continuous { .. } | SlotKind::Discrete { .. } => {
                        VariableValue::Number(value)
                    }
                    SlotKind::Binary => VariableValue::Flag(value >= 0.5),
                    SlotKind::Categorical { options } => {
                        let i = (value as usize).min(options.len() - 1);
                        VariableValue::Choice(options[i].clone())
                    }
                };
                (slot.name.clone(), decoded)
            })
            .collect()
    }

    /// Sum of the weight slots (test/diagnostic helper).
    pub fn weight_sum(&self, genome: &Genome) -> f64 {
        self.weight_slots.iter().map(|&i| genome[i]).sum()
    }
}
