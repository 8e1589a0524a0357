//! Decentralized Queue Consumer Rebalancing
//!
//! A set of apps share a set of queues. Each queue has exactly one *active*
//! consumer: the head of its subscriber list. Nobody coordinates. Each app
//! looks at the global picture once per round and gives up queues it holds
//! beyond its fair share, until active counts differ by at most one.
//!
//! # Protocol
//!
//! 1. Apps subscribe to every queue; the first subscriber becomes active
//! 2. Each round, every app computes its *ideal share* from live counts
//! 3. An app above its share releases the excess (moves to the tail)
//! 4. Optionally, an app at its share also steps back on passive queues
//!    while somebody else is below theirs
//! 5. Stop once every queue is served and counts are within one
//!
//! # Determinism
//!
//! All randomness comes from the caller's [`rand::Rng`]. The same seed and
//! configuration always produce the same run.
//!
//! # Usage
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use rebalance_core::{run, Algorithm, RunConfig, Scenario};
//!
//! let config = RunConfig::new(10, 3)
//!     .with_algorithm(Algorithm::RAND_SUB_NONACTIVE_REL)
//!     .with_scenario(Scenario::LoseOneApp);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let outcome = run(&config, &mut rng).unwrap();
//! assert!(outcome.is_balanced());
//! ```

mod balance;
mod config;
mod engine;
mod error;
mod fault;
mod ideal;
mod init;
mod snapshot;
mod store;
mod variant;

pub use balance::{active_count, active_queues, is_active, is_balanced};
pub use config::{RunConfig, DEFAULT_MAX_ROUNDS};
pub use engine::{RoundEngine, RoundState, RunOutcome};
pub use error::{Error, Result};
pub use fault::kill_one_active_app;
pub use ideal::{ideal_number, rank};
pub use init::{init_subscribe, setup_perfect_balance};
pub use snapshot::{AppState, QueueState, StoreSnapshot};
pub use store::{AppId, QueueId, SubscriptionStore};
pub use variant::{Algorithm, ReleasePolicy, Scenario, SubscriptionOrder};

use rand::Rng;
use tracing::{debug, warn};

/// Build the initial store and roster for a scenario.
///
/// For [`Scenario::LoseOneApp`] the killed app is already gone from both.
pub fn prepare<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Result<(SubscriptionStore, Vec<AppId>)> {
    config.validate()?;

    let mut store = SubscriptionStore::new(config.queue_count, config.app_count);
    let mut roster: Vec<AppId> = (0..config.app_count).map(AppId).collect();

    match config.scenario {
        Scenario::StartUp => {
            init_subscribe(&mut store, config.algorithm.order, &roster, rng);
        }
        Scenario::LoseOneApp => {
            setup_perfect_balance(&mut store, config.algorithm.order, &roster, rng);
            let killed = kill_one_active_app(&mut store, rng)?;
            roster.retain(|&app| app != killed);
        }
    }

    Ok((store, roster))
}

/// Run one simulation to completion.
///
/// Non-convergence is reported as [`RunOutcome::Failed`], not as an error.
pub fn run<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Result<RunOutcome> {
    let (store, roster) = prepare(config, rng)?;
    let mut engine = RoundEngine::new(store, roster, config.algorithm.release, config.max_rounds);
    let outcome = engine.run(rng);

    match outcome {
        RunOutcome::Balanced { rounds, releases } => debug!(
            queues = config.queue_count,
            apps = config.app_count,
            algorithm = %config.algorithm,
            scenario = %config.scenario,
            rounds,
            releases,
            "run balanced"
        ),
        RunOutcome::Failed => warn!(
            queues = config.queue_count,
            apps = config.app_count,
            algorithm = %config.algorithm,
            scenario = %config.scenario,
            max_rounds = config.max_rounds,
            "no balance, check for a bug or raise max rounds"
        ),
    }

    Ok(outcome)
}
