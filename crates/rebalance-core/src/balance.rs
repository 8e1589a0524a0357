//! Read-only balance queries over a [`SubscriptionStore`].
//!
//! A system is *balanced* when every queue has an active consumer and the
//! number of queues each app actively serves differs by at most one.

use crate::store::{AppId, QueueId, SubscriptionStore};

/// Check if `app` is the active consumer (head) of `queue`.
pub fn is_active(store: &SubscriptionStore, queue: QueueId, app: AppId) -> bool {
    store.head(queue) == Some(app)
}

/// Queues where `app` is active, in ascending order.
pub fn active_queues(store: &SubscriptionStore, app: AppId) -> Vec<QueueId> {
    store
        .queue_ids()
        .filter(|&queue| is_active(store, queue, app))
        .collect()
}

/// Number of queues where `app` is active.
pub fn active_count(store: &SubscriptionStore, app: AppId) -> usize {
    store
        .queue_ids()
        .filter(|&queue| is_active(store, queue, app))
        .count()
}

/// Check whether the roster `apps` is balanced over the store.
///
/// False when there are no queues, when any queue has no subscriber, or
/// when the roster is empty.
pub fn is_balanced(store: &SubscriptionStore, apps: &[AppId]) -> bool {
    if store.queue_count() == 0 {
        return false;
    }

    if store.queue_ids().any(|queue| store.head(queue).is_none()) {
        return false;
    }

    let counts = apps.iter().map(|&app| active_count(store, app));
    let Some((min, max)) = counts.fold(None, |acc, c| match acc {
        None => Some((c, c)),
        Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
    }) else {
        return false;
    };

    max - min <= 1
}
