//! The round engine.
//!
//! Every round, each app in the roster (fixed order) compares its active
//! count with its ideal share and releases queues accordingly. Apps are
//! processed one after another against the same store, so each decision
//! sees what earlier apps did in that round.
//!
//! ```text
//! Running(1) ──pass──▶ balanced? ──yes──▶ Balanced(round, releases)
//!     ▲                   │ no
//!     └── Running(r+1) ◀──┤
//!                         └── r+1 > max_rounds ──▶ Failed
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn, Level};

use crate::balance::{active_count, active_queues, is_balanced};
use crate::ideal::ideal_number;
use crate::snapshot::StoreSnapshot;
use crate::store::{AppId, QueueId, SubscriptionStore};
use crate::variant::ReleasePolicy;

/// State of the round loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// The given round is next to execute.
    Running { round: u32 },
    /// Balanced at the end of `round`.
    Balanced { round: u32, releases: u64 },
    /// `max_rounds` passed without balance.
    Failed,
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundState::Running { .. })
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Balanced { rounds: u32, releases: u64 },
    Failed,
}

impl RunOutcome {
    pub fn is_balanced(&self) -> bool {
        matches!(self, RunOutcome::Balanced { .. })
    }

    /// `(rounds, releases)`, or `(-1, -1)` for a failed run. Release counts
    /// beyond `i64::MAX` saturate.
    pub fn as_pair(&self) -> (i64, i64) {
        match *self {
            RunOutcome::Balanced { rounds, releases } => {
                (i64::from(rounds), i64::try_from(releases).unwrap_or(i64::MAX))
            }
            RunOutcome::Failed => (-1, -1),
        }
    }
}

/// Drives one store through rounds until it balances or gives up.
#[derive(Debug)]
pub struct RoundEngine {
    store: SubscriptionStore,
    roster: Vec<AppId>,
    policy: ReleasePolicy,
    max_rounds: u32,
    state: RoundState,
}

impl RoundEngine {
    /// Create an engine positioned at round 1.
    pub fn new(store: SubscriptionStore, roster: Vec<AppId>, policy: ReleasePolicy, max_rounds: u32) -> Self {
        Self {
            store,
            roster,
            policy,
            max_rounds,
            state: RoundState::Running { round: 1 },
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    pub fn roster(&self) -> &[AppId] {
        &self.roster
    }

    pub fn into_store(self) -> SubscriptionStore {
        self.store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::capture(&self.store, &self.roster)
    }

    /// Execute one round. Does nothing once the engine is terminal.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RoundState {
        let RoundState::Running { round } = self.state else {
            return self.state;
        };

        let before = self.store.releases();
        for idx in 0..self.roster.len() {
            let app = self.roster[idx];
            self.decide(app, rng);
        }

        debug!(round, releases = self.store.releases() - before, "round complete");
        self.dump_state(round);

        self.state = if is_balanced(&self.store, &self.roster) {
            debug!(round, releases = self.store.releases(), "balanced");
            RoundState::Balanced {
                round,
                releases: self.store.releases(),
            }
        } else if round >= self.max_rounds {
            warn!(max_rounds = self.max_rounds, "no balance within max rounds");
            RoundState::Failed
        } else {
            RoundState::Running { round: round + 1 }
        };
        self.state
    }

    /// Run rounds until a terminal state.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RunOutcome {
        loop {
            match self.step(rng) {
                RoundState::Running { .. } => continue,
                RoundState::Balanced { round, releases } => {
                    return RunOutcome::Balanced {
                        rounds: round,
                        releases,
                    }
                }
                RoundState::Failed => return RunOutcome::Failed,
            }
        }
    }

    /// One app's turn. Returns the number of releases it made.
    fn decide<R: Rng + ?Sized>(&mut self, app: AppId, rng: &mut R) -> u64 {
        let before = self.store.releases();
        let ideal = ideal_number(&self.store, &self.roster, app);
        let active = active_count(&self.store, app);

        if active > ideal {
            let mut excess = active - ideal;
            let mut queues = active_queues(&self.store, app);
            queues.shuffle(rng);
            for queue in queues {
                self.store.release(app, queue);
                excess -= 1;
                if excess == 0 {
                    break;
                }
            }
        } else if active == ideal && self.policy == ReleasePolicy::ActiveAndPassive {
            // One full pass over the passive queues per deficient app. Repeats
            // are counted even though only the first pass reorders anything.
            for &other in &self.roster {
                if other == app {
                    continue;
                }
                if active_count(&self.store, other) >= ideal_number(&self.store, &self.roster, other) {
                    continue;
                }

                let held = active_queues(&self.store, app);
                let passive: Vec<QueueId> = self
                    .store
                    .subscriptions(app)
                    .map(|queues| queues.iter().copied().filter(|q| !held.contains(q)).collect())
                    .unwrap_or_default();
                for queue in passive {
                    self.store.release(app, queue);
                }
            }
        }

        let released = self.store.releases() - before;
        if released > 0 {
            trace!(%app, active, ideal, released, "released queues");
        }
        released
    }

    fn dump_state(&self, round: u32) {
        if !tracing::enabled!(Level::TRACE) {
            return;
        }
        let snapshot = self.snapshot();
        for queue in &snapshot.queues {
            trace!(
                round,
                queue = %queue.queue,
                subscribers = ?queue.subscribers,
                active = ?queue.active,
                "queue state"
            );
        }
        for app in &snapshot.apps {
            trace!(round, app = %app.app, active = app.active, ideal = app.ideal, "app state");
        }
    }
}
