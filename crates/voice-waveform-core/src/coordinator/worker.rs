use crate::{
    AttachmentSource, AudioConverter, CacheKey, LoadOutcome, WaveformSampler,
    coordinator::{Pipeline, Shared, StageGuard, resolve_all},
};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Work handed to the worker for a key that has just become pending.
pub(crate) struct Job {
    pub(crate) key: CacheKey,
    pub(crate) attachment: Arc<dyn AttachmentSource>,
    pub(crate) generation: u64,
    pub(crate) request_id: Uuid,
}

/// Single consumer that runs one pipeline execution at a time.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    jobs: mpsc::Receiver<Job>,
    converter: Arc<dyn AudioConverter>,
    sampler: Arc<dyn WaveformSampler>,
    guard: StageGuard,
}

impl Worker {
    pub(crate) fn new(
        shared: Arc<Shared>,
        jobs: mpsc::Receiver<Job>,
        converter: Arc<dyn AudioConverter>,
        sampler: Arc<dyn WaveformSampler>,
        guard: StageGuard,
    ) -> Self {
        Self {
            shared,
            jobs,
            converter,
            sampler,
            guard,
        }
    }

    /// Drain the job queue until every coordinator handle is dropped.
    pub(crate) async fn run(mut self) {
        info!("Waveform worker started");

        while let Some(job) = self.jobs.recv().await {
            self.process(job).await;
        }

        info!("Waveform worker stopped");
    }

    #[instrument(
        skip_all,
        fields(key = %job.key, request_id = %job.request_id, generation = job.generation)
    )]
    async fn process(&mut self, job: Job) {
        let reusable = {
            let mut state = self.shared.state.lock().await;

            if job.generation != state.generation || !state.pending.contains(&job.key) {
                debug!("Skipping job discarded by cache clear");
                return;
            }

            // Registered after an earlier execution for the same key already committed.
            if let Some(outcome) = state.cache.lookup(&job.key) {
                let waiters = state.pending.take(&job.key);
                drop(state);
                debug!(waiters = waiters.len(), "Resolving from cache");
                resolve_all(waiters, Ok(outcome), &self.shared.delivery);
                return;
            }

            state.cache.conversion(&job.key.identity).cloned()
        };

        self.guard.arm(job.generation);

        let mut pipeline = Pipeline {
            converter: self.converter.as_ref(),
            sampler: self.sampler.as_ref(),
            storage: &self.shared.storage,
            guard: &mut self.guard,
        };

        let result = match reusable {
            Some(record) => pipeline.run_sampling(&job.key, record).await,
            None => pipeline.run_full(&job.key, job.attachment.as_ref()).await,
        };

        let waiters = {
            let mut state = self.shared.state.lock().await;

            if state.generation != job.generation {
                // The clear already failed these waiters with Cancelled.
                warn!("Discarding result produced before cache clear");
                return;
            }

            if let Ok(output) = &result {
                state.cache.store(
                    job.key.clone(),
                    output.record.clone(),
                    Arc::clone(&output.samples),
                );
            }

            state.pending.take(&job.key)
        };

        let outcome = match result {
            Ok(output) => {
                info!(waiters = waiters.len(), "Waveform ready");
                Ok(LoadOutcome::new(&job.key, &output.record, output.samples))
            }
            Err(e) => {
                if e.is_cancellation() {
                    info!(waiters = waiters.len(), "Waveform request cancelled");
                } else {
                    error!(waiters = waiters.len(), error = %e, "Waveform pipeline failed");
                }
                Err(Arc::new(e))
            }
        };

        resolve_all(waiters, outcome, &self.shared.delivery);
    }
}
