use crate::{
    AttachmentSource, AudioConverter, CacheConfig, CacheKey, CacheStats, LoadOutcome,
    SharedError, TemporaryStorage, WaveformError, WaveformSampler,
    cache::ResultCache,
    coordinator::{DeliveryQueue, Job, PendingRegistry, StageGuard, Waiter, Worker, resolve_all},
    error::Result as CoreResult,
};

use std::{panic::Location, path::Path, sync::Arc};

use error_location::ErrorLocation;
use tokio::{
    runtime::Handle,
    sync::{Mutex, mpsc, oneshot, watch},
    task,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Outcome delivered to every caller of one pipeline execution.
pub type LoadResult = std::result::Result<LoadOutcome, SharedError>;

/// Completion callback for [`WaveformCoordinator::load_with_completion`].
pub type Completion = Box<dyn FnOnce(LoadResult) + Send + 'static>;

/// Cache records, waiters and the clear generation, guarded together.
#[derive(Default)]
pub(crate) struct CoordinatorState {
    pub(crate) cache: ResultCache,
    pub(crate) pending: PendingRegistry,
    pub(crate) generation: u64,
}

/// State shared between coordinator handles and the worker.
pub(crate) struct Shared {
    pub(crate) state: Mutex<CoordinatorState>,
    pub(crate) storage: TemporaryStorage,
    pub(crate) delivery: DeliveryQueue,
    pub(crate) clears: watch::Sender<u64>,
}

/// Loads, caches and deduplicates waveforms for voice attachments.
///
/// All processing runs on one worker task: at most one external stage is in
/// flight at any time. Concurrent requests for the same attachment and
/// resolution share a single execution and receive the same result.
///
/// # Lifecycle
///
/// Construct inside a tokio runtime. Dropping the coordinator closes the job
/// queue; the worker finishes its current job and exits, and callers still
/// waiting receive `Cancelled`.
pub struct WaveformCoordinator {
    shared: Arc<Shared>,
    jobs: mpsc::Sender<Job>,
}

impl WaveformCoordinator {
    /// Creates a coordinator and spawns its worker and delivery tasks.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or no tokio runtime is
    /// running on the current thread.
    #[track_caller]
    #[instrument(skip(converter, sampler))]
    pub fn new(
        config: CacheConfig,
        converter: Arc<dyn AudioConverter>,
        sampler: Arc<dyn WaveformSampler>,
    ) -> CoreResult<Self> {
        config.validate()?;

        let handle = Handle::try_current().map_err(|e| WaveformError::RuntimeUnavailable {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let (clears, clears_rx) = watch::channel(0);
        let (jobs, jobs_rx) = mpsc::channel(config.worker.queue_capacity);

        let shared = Arc::new(Shared {
            state: Mutex::new(CoordinatorState::default()),
            storage: TemporaryStorage::new(&config.storage),
            delivery: DeliveryQueue::spawn(&handle),
            clears,
        });

        let guard = StageGuard::new(config.worker.stage_timeout(), clears_rx);
        let worker = Worker::new(Arc::clone(&shared), jobs_rx, converter, sampler, guard);
        handle.spawn(worker.run());

        info!(
            scratch_dir = ?shared.storage.path(),
            stage_timeout = ?config.worker.stage_timeout(),
            "WaveformCoordinator initialized"
        );

        Ok(Self { shared, jobs })
    }

    /// Load the waveform of `attachment` at `sample_count` resolution.
    ///
    /// Invalid input fails immediately without touching the cache or the
    /// worker. A full cache hit returns without queuing work.
    pub async fn load(
        &self,
        attachment: Arc<dyn AttachmentSource>,
        sample_count: usize,
    ) -> LoadResult {
        let (tx, rx) = oneshot::channel();
        self.submit(attachment, sample_count, Waiter::Channel(tx))
            .await;

        // Sender dropped without a result: the worker went away.
        rx.await
            .unwrap_or_else(|_| Err(Arc::new(WaveformError::cancelled())))
    }

    /// Callback flavour of [`load`](Self::load).
    ///
    /// `completion` runs on the coordinator's delivery task, never on the
    /// caller's task, including for validation failures and cache hits.
    pub async fn load_with_completion<F>(
        &self,
        attachment: Arc<dyn AttachmentSource>,
        sample_count: usize,
        completion: F,
    ) where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        self.submit(attachment, sample_count, Waiter::Callback(Box::new(completion)))
            .await;
    }

    /// Fail every pending request with `Cancelled`, drop all records and
    /// delete the scratch directory.
    ///
    /// When this returns, every waiter registered before the call has been
    /// resolved and any stage in flight has been abandoned.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) {
        let (waiters, detached) = {
            let mut state = self.shared.state.lock().await;
            state.generation += 1;
            state.cache.clear();
            let _ = self.shared.clears.send_replace(state.generation);
            (state.pending.drain(), self.shared.storage.detach())
        };

        info!(cancelled = waiters.len(), "Waveform cache cleared");

        resolve_all(
            waiters,
            Err(Arc::new(WaveformError::cancelled())),
            &self.shared.delivery,
        );

        // The live path is already free, so the tree is removed off the lock.
        if let Some(dir) = detached {
            let cleanup = task::spawn_blocking(move || TemporaryStorage::remove_tree(&dir));
            if let Err(e) = cleanup.await {
                warn!(error = %e, "Scratch cleanup task failed");
            }
        }
    }

    /// Remove one identity's records and canonical file.
    ///
    /// Returns `false` when nothing was cached for the identity, or when work
    /// for it is still pending (the records are then left untouched).
    #[instrument(skip(self))]
    pub async fn evict(&self, identity: &str) -> bool {
        let mut state = self.shared.state.lock().await;

        if state.pending.has_identity(identity) {
            debug!("Eviction skipped, work pending for identity");
            return false;
        }

        match state.cache.evict(identity) {
            Some(record) => {
                self.shared.storage.remove_file(&record.canonical_path);
                info!("Identity evicted");
                true
            }
            None => false,
        }
    }

    /// Cached result for an exact key, without queuing any work.
    pub async fn cached_outcome(&self, identity: &str, sample_count: usize) -> Option<LoadOutcome> {
        let key = CacheKey::new(identity, sample_count);
        self.shared.state.lock().await.cache.lookup(&key)
    }

    /// Snapshot of cache and pending-request counts.
    pub async fn stats(&self) -> CacheStats {
        let state = self.shared.state.lock().await;
        CacheStats {
            conversions: state.cache.conversion_count(),
            sample_sets: state.cache.sample_set_count(),
            pending_keys: state.pending.key_count(),
            pending_waiters: state.pending.waiter_count(),
        }
    }

    /// Scratch directory holding canonical files.
    pub fn scratch_dir(&self) -> &Path {
        self.shared.storage.path()
    }

    #[instrument(skip(self, attachment, waiter), fields(request_id = tracing::field::Empty))]
    async fn submit(&self, attachment: Arc<dyn AttachmentSource>, sample_count: usize, waiter: Waiter) {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let key = match self.validate(attachment.as_ref(), sample_count) {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "Load rejected");
                waiter.resolve(Err(Arc::new(e)), &self.shared.delivery);
                return;
            }
        };

        let waiter = {
            let mut state = self.shared.state.lock().await;
            match settle(&mut state, &key, waiter, &self.shared.delivery) {
                Some(waiter) => waiter,
                None => return,
            }
        };

        // Nothing is registered until a queue slot is held, so a caller
        // dropped while waiting for room leaves no pending entry behind.
        let permit = match self.jobs.reserve().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!(key = %key, "Worker is gone, failing request");
                waiter.resolve(Err(Arc::new(WaveformError::cancelled())), &self.shared.delivery);
                return;
            }
        };

        let mut state = self.shared.state.lock().await;

        // Another caller may have started or finished this key while we waited.
        let Some(waiter) = settle(&mut state, &key, waiter, &self.shared.delivery) else {
            return;
        };

        state.pending.start(key.clone(), waiter);
        permit.send(Job {
            key,
            attachment,
            generation: state.generation,
            request_id,
        });

        debug!("Queued pipeline job");
    }

    #[track_caller]
    fn validate(&self, attachment: &dyn AttachmentSource, sample_count: usize) -> CoreResult<CacheKey> {
        let kind = attachment.kind();
        if !kind.is_audio() {
            return Err(WaveformError::InvalidAttachmentKind {
                kind: kind.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let identity = attachment
            .identity()
            .filter(|identity| !identity.is_empty())
            .ok_or_else(|| WaveformError::InvalidIdentity {
                location: ErrorLocation::from(Location::caller()),
            })?;

        if sample_count == 0 {
            return Err(WaveformError::InvalidSampleCount {
                requested: sample_count,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.shared.storage.ensure_created()?;

        Ok(CacheKey::new(identity, sample_count))
    }
}

/// Serve `waiter` from the cache or attach it to pending work for `key`.
///
/// Returns the waiter when a new execution has to be queued.
fn settle(
    state: &mut CoordinatorState,
    key: &CacheKey,
    waiter: Waiter,
    delivery: &DeliveryQueue,
) -> Option<Waiter> {
    if let Some(outcome) = state.cache.lookup(key) {
        debug!(key = %key, "Cache hit");
        waiter.resolve(Ok(outcome), delivery);
        return None;
    }

    match state.pending.join(key, waiter) {
        Ok(()) => {
            debug!(key = %key, "Joined pending request");
            None
        }
        Err(waiter) => Some(waiter),
    }
}
