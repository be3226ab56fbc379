//! Sequential decrypt → convert → probe → sample pipeline.
//!
//! Each stage awaits one external collaborator through the [`StageGuard`] and
//! maps its [`StageError`] onto the matching [`WaveformError`] kind at the
//! stage boundary. Nothing here touches the cache; the worker commits the
//! output once every stage has succeeded.

use crate::{
    AttachmentSource, AudioConverter, CacheKey, ConversionRecord, StageError, TemporaryStorage,
    WaveformError, WaveformSampler,
    coordinator::{Stage, StageGuard},
    error::Result as CoreResult,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Records produced by one successful execution.
#[derive(Debug)]
pub(crate) struct PipelineOutput {
    pub(crate) record: ConversionRecord,
    pub(crate) samples: Arc<[f32]>,
}

/// Borrowed collaborators for a single job.
pub(crate) struct Pipeline<'a> {
    pub(crate) converter: &'a dyn AudioConverter,
    pub(crate) sampler: &'a dyn WaveformSampler,
    pub(crate) storage: &'a TemporaryStorage,
    pub(crate) guard: &'a mut StageGuard,
}

impl Pipeline<'_> {
    /// Run every stage for an identity with no conversion on record.
    #[instrument(skip_all, fields(key = %key))]
    pub(crate) async fn run_full(
        &mut self,
        key: &CacheKey,
        attachment: &dyn AttachmentSource,
    ) -> CoreResult<PipelineOutput> {
        let start = Instant::now();

        let source = self.acquire_source(&key.identity, attachment).await?;
        let canonical_path = self.ensure_canonical(&key.identity, &source).await?;
        let duration = self.probe_duration(&canonical_path).await?;
        let samples = self.sample(&canonical_path, key.sample_count).await?;

        info!(
            duration_ms = duration.as_millis(),
            elapsed_ms = start.elapsed().as_millis(),
            "Attachment processed"
        );

        Ok(PipelineOutput {
            record: ConversionRecord {
                canonical_path,
                duration,
            },
            samples,
        })
    }

    /// Sample a previously converted file at a new resolution.
    #[instrument(skip_all, fields(key = %key))]
    pub(crate) async fn run_sampling(
        &mut self,
        key: &CacheKey,
        record: ConversionRecord,
    ) -> CoreResult<PipelineOutput> {
        debug!(canonical_path = ?record.canonical_path, "Reusing converted file");

        let samples = self.sample(&record.canonical_path, key.sample_count).await?;

        Ok(PipelineOutput { record, samples })
    }

    async fn acquire_source(
        &mut self,
        identity: &str,
        attachment: &dyn AttachmentSource,
    ) -> CoreResult<PathBuf> {
        if attachment.is_encrypted() {
            let result = self.guard.run(Stage::Decrypt, attachment.decrypt()).await?;
            let path = result.map_err(|e| stage_failure(SourceStage::Decrypt, identity, e))?;
            debug!(source = ?path, "Attachment decrypted");
            return Ok(path);
        }

        let result = self.guard.run(Stage::Prepare, attachment.prepare()).await?;
        result.map_err(|e| stage_failure(SourceStage::Prepare, identity, e))?;

        let path = attachment.cached_file_path();
        debug!(source = ?path, "Attachment prepared");
        Ok(path)
    }

    async fn ensure_canonical(&mut self, identity: &str, source: &Path) -> CoreResult<PathBuf> {
        let destination = self.storage.canonical_path(identity, source);

        if destination.is_file() {
            debug!(canonical_path = ?destination, "Canonical file already on disk");
            return Ok(destination);
        }

        // A cache clear may have removed the directory since `load` checked it.
        self.storage.ensure_created()?;

        let result = self
            .guard
            .run(
                Stage::Convert,
                self.converter.convert_to_canonical(source, &destination),
            )
            .await?;
        result.map_err(|e| stage_failure(SourceStage::Convert, identity, e))?;

        if !destination.is_file() {
            return Err(WaveformError::ConversionFailed {
                identity: identity.to_string(),
                reason: format!("Converter reported success but wrote no file at {destination:?}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(canonical_path = ?destination, "Converted to canonical format");
        Ok(destination)
    }

    async fn probe_duration(&mut self, canonical_path: &Path) -> CoreResult<Duration> {
        let result = self
            .guard
            .run(
                Stage::ProbeDuration,
                self.converter.probe_duration(canonical_path),
            )
            .await?;

        match result {
            Ok(Some(duration)) => Ok(duration),
            Ok(None) => Err(WaveformError::DurationProbeFailed {
                path: canonical_path.to_path_buf(),
                reason: "No duration reported".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(StageError::Cancelled) => Err(WaveformError::cancelled()),
            Err(StageError::Failed { reason }) => Err(WaveformError::DurationProbeFailed {
                path: canonical_path.to_path_buf(),
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn sample(&mut self, canonical_path: &Path, count: usize) -> CoreResult<Arc<[f32]>> {
        let samples = self
            .guard
            .run(Stage::Sample, self.sampler.sample(canonical_path, count))
            .await?
            .ok_or_else(|| WaveformError::SamplingFailed {
                path: canonical_path.to_path_buf(),
                sample_count: count,
                reason: "Sampler returned no data".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if samples.len() != count {
            return Err(WaveformError::SamplingFailed {
                path: canonical_path.to_path_buf(),
                sample_count: count,
                reason: format!("Sampler returned {} samples", samples.len()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(samples.into())
    }
}

/// Stages whose failures are reported against the attachment identity.
///
/// Probe and sample failures carry the canonical path instead and are
/// mapped where they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceStage {
    Decrypt,
    Prepare,
    Convert,
}

/// Map a collaborator error from the attachment or conversion stages.
#[track_caller]
pub(crate) fn stage_failure(stage: SourceStage, identity: &str, error: StageError) -> WaveformError {
    let location = ErrorLocation::from(Location::caller());
    let reason = match error {
        StageError::Cancelled => return WaveformError::Cancelled { location },
        StageError::Failed { reason } => reason,
    };
    let identity = identity.to_string();

    match stage {
        SourceStage::Decrypt => WaveformError::DecryptionFailed {
            identity,
            reason,
            location,
        },
        SourceStage::Prepare => WaveformError::PreparationFailed {
            reason: format!("{identity}: {reason}"),
            location,
        },
        SourceStage::Convert => WaveformError::ConversionFailed {
            identity,
            reason,
            location,
        },
    }
}
