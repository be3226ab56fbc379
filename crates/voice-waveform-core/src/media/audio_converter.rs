use crate::StageError;

use std::{path::Path, time::Duration};

use async_trait::async_trait;

/// Converts source audio to the canonical playable format.
///
/// Implementations are never invoked concurrently by the coordinator.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    /// Write a canonical encoding of `source` to `destination`.
    async fn convert_to_canonical(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<(), StageError>;

    /// Probe the playback duration of `file`.
    ///
    /// `Ok(None)` means the container reported no duration.
    async fn probe_duration(&self, file: &Path) -> Result<Option<Duration>, StageError>;
}
