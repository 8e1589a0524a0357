//! Ideal share: how many queues an app should actively serve.
//!
//! With `q` queues and `n` apps every app gets `q / n`, and the `q % n`
//! leftover queues go to the apps ranked first by (most active queues,
//! lowest id). Ranking by the live active counts means the apps already
//! holding extra queues keep them, which minimises releases.
//!
//! The share is always computed against the current store. Nothing is cached.

use crate::balance::active_count;
use crate::store::{AppId, SubscriptionStore};

/// Rank of `app` among `apps` ordered by descending active count, then
/// ascending id. Zero is the first rank.
pub fn rank(store: &SubscriptionStore, apps: &[AppId], app: AppId) -> usize {
    let own = active_count(store, app);
    apps.iter()
        .filter(|&&other| other != app)
        .filter(|&&other| {
            let count = active_count(store, other);
            count > own || (count == own && other < app)
        })
        .count()
}

/// Number of queues `app` should actively serve for the roster `apps`.
///
/// Returns 0 for an empty roster.
pub fn ideal_number(store: &SubscriptionStore, apps: &[AppId], app: AppId) -> usize {
    if apps.is_empty() {
        return 0;
    }

    let base = store.queue_count() / apps.len();
    let remainder = store.queue_count() % apps.len();
    let position = rank(store, apps, app);

    if remainder > position {
        base + 1
    } else {
        base
    }
}
