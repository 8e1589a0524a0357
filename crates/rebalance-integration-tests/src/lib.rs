//! Shared helpers for cross-crate tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rebalance_cli::{CountRange, SweepConfig};
use rebalance_core::{Algorithm, Scenario};

/// Deterministic RNG for a test.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A sweep small enough for a test: every variant, a handful of samples.
pub fn small_sweep(queues: usize, apps: CountRange, samples: u64) -> SweepConfig {
    SweepConfig {
        queue_counts: CountRange::single(queues),
        app_counts: apps,
        samples,
        max_rounds: 1000,
        algorithms: Algorithm::ALL.to_vec(),
        scenarios: Scenario::ALL.to_vec(),
        seed: Some(0),
        ..SweepConfig::default()
    }
}
