//! The subscription store: who is subscribed to which queue, and in what order.
//!
//! Each queue keeps an ordered subscriber list. The head of that list is the
//! queue's *active* consumer; everybody behind it is passive. Each app keeps
//! the set of queues it has subscribed to. Releasing a queue moves the app to
//! the back of the line without unsubscribing it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a queue, in `[0, queue_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueId(pub usize);

/// Identifier of an app (consumer), in `[0, app_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub usize);

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app{}", self.0)
    }
}

/// Mutable state of one simulation run.
///
/// Invariants:
/// - an app appears at most once in any subscriber list
/// - an app is in a queue's list iff the queue is in the app's subscription set
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    /// Subscriber list per queue, indexed by `QueueId`.
    queues: Vec<VecDeque<AppId>>,
    /// Subscribed queues per app.
    subscriptions: BTreeMap<AppId, BTreeSet<QueueId>>,
    /// Total number of releases performed.
    releases: u64,
}

impl SubscriptionStore {
    /// Create a store with `queue_count` empty queues and `app_count` apps
    /// that have no subscriptions yet.
    pub fn new(queue_count: usize, app_count: usize) -> Self {
        Self {
            queues: vec![VecDeque::new(); queue_count],
            subscriptions: (0..app_count).map(|a| (AppId(a), BTreeSet::new())).collect(),
            releases: 0,
        }
    }

    /// Number of queues.
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// All queue ids in ascending order.
    pub fn queue_ids(&self) -> impl Iterator<Item = QueueId> + '_ {
        (0..self.queues.len()).map(QueueId)
    }

    /// All apps the store knows about, in ascending order.
    pub fn app_ids(&self) -> impl Iterator<Item = AppId> + '_ {
        self.subscriptions.keys().copied()
    }

    /// Ordered subscriber list of a queue.
    pub fn subscribers(&self, queue: QueueId) -> Option<&VecDeque<AppId>> {
        self.queues.get(queue.0)
    }

    /// The active consumer of a queue, if it has any subscriber.
    pub fn head(&self, queue: QueueId) -> Option<AppId> {
        self.queues.get(queue.0).and_then(|list| list.front().copied())
    }

    /// Queues an app has subscribed to.
    pub fn subscriptions(&self, app: AppId) -> Option<&BTreeSet<QueueId>> {
        self.subscriptions.get(&app)
    }

    /// Check whether `app` is subscribed to `queue`.
    pub fn is_subscribed(&self, app: AppId, queue: QueueId) -> bool {
        self.subscriptions
            .get(&app)
            .is_some_and(|queues| queues.contains(&queue))
    }

    /// Append `app` to the tail of `queue`'s subscriber list.
    ///
    /// Returns false (and changes nothing) if the app is already subscribed
    /// or the queue does not exist.
    pub fn subscribe(&mut self, app: AppId, queue: QueueId) -> bool {
        let Some(list) = self.queues.get_mut(queue.0) else {
            return false;
        };
        if !self.subscriptions.entry(app).or_default().insert(queue) {
            return false;
        }
        list.push_back(app);
        true
    }

    /// Release primitive: move `app` to the tail of `queue`'s subscriber list.
    ///
    /// Demotes the app if it was active. Membership is unchanged. Every
    /// successful call counts as one release, even if the app was already
    /// at the tail.
    pub fn release(&mut self, app: AppId, queue: QueueId) -> bool {
        let Some(list) = self.queues.get_mut(queue.0) else {
            return false;
        };
        let Some(pos) = list.iter().position(|&a| a == app) else {
            return false;
        };
        list.remove(pos);
        list.push_back(app);
        self.releases += 1;
        true
    }

    /// Remove an app from every subscriber list and forget its subscriptions.
    ///
    /// Returns the number of queues it was removed from.
    pub fn remove_app(&mut self, app: AppId) -> usize {
        let mut removed = 0;
        for list in &mut self.queues {
            if let Some(pos) = list.iter().position(|&a| a == app) {
                list.remove(pos);
                removed += 1;
            }
        }
        self.subscriptions.remove(&app);
        removed
    }

    /// Total releases performed on this store.
    pub fn releases(&self) -> u64 {
        self.releases
    }
}
