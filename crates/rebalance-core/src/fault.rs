//! Crash injection.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::store::{AppId, SubscriptionStore};

/// Kill one app that is currently active on at least one queue.
///
/// The victim is picked uniformly among active apps and removed from every
/// subscriber list, active and passive positions alike. The caller removes
/// the returned id from its roster.
pub fn kill_one_active_app<R: Rng + ?Sized>(store: &mut SubscriptionStore, rng: &mut R) -> Result<AppId> {
    let active: BTreeSet<AppId> = store.queue_ids().filter_map(|queue| store.head(queue)).collect();
    let candidates: Vec<AppId> = active.into_iter().collect();

    let victim = *candidates.choose(rng).ok_or(Error::NoActiveApp)?;
    let removed = store.remove_app(victim);

    info!(app = %victim, candidates = candidates.len(), queues = removed, "killed active app");
    Ok(victim)
}
