//! Tournament selection.
//!
//! The GA uses tournament selection with a fixed tournament size: pick `k`
//! individuals uniformly at random and keep the fittest. Moderate, tunable
//! selection pressure without fitness-scaling pathologies.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

use super::runner::Scored;

/// Selects a parent index via a `k`-way tournament.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[Scored], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness > population[best_idx].fitness {
            best_idx = idx;
        }
    }
    best_idx
}
