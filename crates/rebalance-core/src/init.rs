//! Initial subscriptions.
//!
//! RabbitMQ-style single-active-consumer queues make the first subscriber
//! the active one, so the order in which apps subscribe decides the
//! starting distribution.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::store::{AppId, QueueId, SubscriptionStore};
use crate::variant::SubscriptionOrder;

/// Subscribe every app in `apps` to every queue it is not yet subscribed to.
///
/// Only appends; an existing subscription keeps its position. Returns the
/// number of new subscriptions.
pub fn init_subscribe<R: Rng + ?Sized>(
    store: &mut SubscriptionStore,
    order: SubscriptionOrder,
    apps: &[AppId],
    rng: &mut R,
) -> usize {
    let queues: Vec<QueueId> = store.queue_ids().collect();

    let pairs: Vec<(AppId, QueueId)> = match order {
        SubscriptionOrder::Random => {
            let mut pairs: Vec<_> = apps
                .iter()
                .flat_map(|&app| queues.iter().map(move |&queue| (app, queue)))
                .collect();
            pairs.shuffle(rng);
            pairs
        }
        SubscriptionOrder::Sequential => {
            let mut roster = apps.to_vec();
            roster.shuffle(rng);
            roster
                .into_iter()
                .flat_map(|app| queues.iter().map(move |&queue| (app, queue)))
                .collect()
        }
    };

    let added = pairs
        .into_iter()
        .filter(|&(app, queue)| store.subscribe(app, queue))
        .count();

    debug!(?order, apps = apps.len(), added, "initial subscriptions done");
    added
}

/// Start from a perfectly balanced assignment, then fill in the rest.
///
/// Queue `q` first gets app `apps[q % apps.len()]` as its sole subscriber,
/// so active counts differ by at most one. Everything else is subscribed
/// passively by [`init_subscribe`].
pub fn setup_perfect_balance<R: Rng + ?Sized>(
    store: &mut SubscriptionStore,
    order: SubscriptionOrder,
    apps: &[AppId],
    rng: &mut R,
) -> usize {
    if apps.is_empty() {
        return 0;
    }

    let queues: Vec<QueueId> = store.queue_ids().collect();
    let seeded = queues
        .into_iter()
        .filter(|&queue| store.subscribe(apps[queue.0 % apps.len()], queue))
        .count();

    seeded + init_subscribe(store, order, apps, rng)
}
