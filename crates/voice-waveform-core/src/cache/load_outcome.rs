use crate::{CacheKey, ConversionRecord};

use std::{path::PathBuf, sync::Arc, time::Duration};

/// Successful result of a waveform load.
///
/// Samples are shared, so every caller of one pipeline execution observes the
/// same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// Attachment identity.
    pub identity: String,
    /// Canonical playable file.
    pub canonical_path: PathBuf,
    /// Playback duration.
    pub duration: Duration,
    /// Normalized amplitudes, one per requested sample.
    pub samples: Arc<[f32]>,
}

impl LoadOutcome {
    pub(crate) fn new(key: &CacheKey, record: &ConversionRecord, samples: Arc<[f32]>) -> Self {
        Self {
            identity: key.identity.clone(),
            canonical_path: record.canonical_path.clone(),
            duration: record.duration,
            samples,
        }
    }
}
