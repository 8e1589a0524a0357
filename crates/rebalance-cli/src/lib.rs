//! Drivers behind the `rebalance-sim` and `rebalance-percentiles` binaries.
//!
//! - [`SweepConfig`]: which configurations to run and how often
//! - [`run_sweep`]: run them and write the result table
//! - [`write_percentiles`]: summarise a result table per group

mod cli;
mod config;
mod percentiles;
mod sweep;

pub use cli::{PercentileArgs, SimArgs};
pub use config::{CountRange, SweepConfig};
pub use percentiles::{write_percentiles, PercentileReport};
pub use sweep::{run_single, run_sweep, SingleRun, SweepReport};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Seeded RNG for a sweep. Without a configured seed one is drawn and
/// logged so the sweep can be replayed.
pub fn sweep_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "random seed");
    (StdRng::seed_from_u64(seed), seed)
}
