//! Deterministic RNG utilities for reproducible tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw `phases` positive durations summing to `total`.
///
/// Every phase gets at least a quarter of the mean duration, so the derived
/// last phase of a schedule built from the result is never degenerate.
pub fn random_timings(rng: &mut impl Rng, phases: usize, total: f64) -> Vec<f64> {
    assert!(phases > 0, "need at least one phase");
    let weights: Vec<f64> = (0..phases).map(|_| rng.gen_range(0.25..1.0)).collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| w / sum * total).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
