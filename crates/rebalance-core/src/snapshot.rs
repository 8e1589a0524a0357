//! Serializable view of a store, for trace dumps and debugging output.

use serde::{Deserialize, Serialize};

use crate::balance::active_count;
use crate::ideal::ideal_number;
use crate::store::{AppId, QueueId, SubscriptionStore};

/// State of one queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    pub queue: QueueId,
    pub subscribers: Vec<AppId>,
    pub active: Option<AppId>,
}

/// Active and ideal counts of one roster app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub app: AppId,
    pub active: usize,
    pub ideal: usize,
}

/// Point-in-time copy of a store and its roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub queues: Vec<QueueState>,
    pub apps: Vec<AppState>,
    pub releases: u64,
}

impl StoreSnapshot {
    pub fn capture(store: &SubscriptionStore, apps: &[AppId]) -> Self {
        let queues = store
            .queue_ids()
            .map(|queue| QueueState {
                queue,
                subscribers: store
                    .subscribers(queue)
                    .map(|list| list.iter().copied().collect())
                    .unwrap_or_default(),
                active: store.head(queue),
            })
            .collect();

        let apps = apps
            .iter()
            .map(|&app| AppState {
                app,
                active: active_count(store, app),
                ideal: ideal_number(store, apps, app),
            })
            .collect();

        Self {
            queues,
            apps,
            releases: store.releases(),
        }
    }
}
