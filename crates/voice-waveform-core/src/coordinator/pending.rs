use crate::{
    CacheKey,
    coordinator::{Completion, DeliveryQueue, LoadResult},
};

use std::collections::HashMap;

use tokio::sync::oneshot;

/// A caller waiting for a pipeline result.
pub(crate) enum Waiter {
    /// Caller awaiting [`WaveformCoordinator::load`](crate::WaveformCoordinator::load).
    Channel(oneshot::Sender<LoadResult>),
    /// Callback run on the delivery task.
    Callback(Completion),
}

impl Waiter {
    pub(crate) fn resolve(self, result: LoadResult, delivery: &DeliveryQueue) {
        match self {
            // Receiver gone means the caller stopped waiting.
            Waiter::Channel(tx) => {
                let _ = tx.send(result);
            }
            Waiter::Callback(completion) => delivery.dispatch(completion, result),
        }
    }
}

/// Hand the same result to every waiter, in registration order.
pub(crate) fn resolve_all(waiters: Vec<Waiter>, result: LoadResult, delivery: &DeliveryQueue) {
    for waiter in waiters {
        waiter.resolve(result.clone(), delivery);
    }
}

/// Waiters per key with a queued or running execution.
#[derive(Default)]
pub(crate) struct PendingRegistry {
    entries: HashMap<CacheKey, Vec<Waiter>>,
}

impl PendingRegistry {
    /// Attach to work already pending for `key`, or hand the waiter back.
    pub(crate) fn join(&mut self, key: &CacheKey, waiter: Waiter) -> Result<(), Waiter> {
        match self.entries.get_mut(key) {
            Some(waiters) => {
                waiters.push(waiter);
                Ok(())
            }
            None => Err(waiter),
        }
    }

    /// Mark `key` pending with its first waiter. The caller must already
    /// hold a queue slot for the job.
    pub(crate) fn start(&mut self, key: CacheKey, waiter: Waiter) {
        self.entries.insert(key, vec![waiter]);
    }

    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn has_identity(&self, identity: &str) -> bool {
        self.entries.keys().any(|key| key.identity == identity)
    }

    pub(crate) fn take(&mut self, key: &CacheKey) -> Vec<Waiter> {
        self.entries.remove(key).unwrap_or_default()
    }

    pub(crate) fn drain(&mut self) -> Vec<Waiter> {
        self.entries.drain().flat_map(|(_, waiters)| waiters).collect()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn waiter_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
