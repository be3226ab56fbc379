use std::{panic::Location, path::PathBuf, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use thiserror::Error;

/// Waveform pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum WaveformError {
    /// Attachment is not a voice message or audio file.
    #[error("Unsupported attachment kind: {kind} {location}")]
    InvalidAttachmentKind {
        /// Kind reported by the attachment.
        kind: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Attachment has no stable identity to key the cache with.
    #[error("Attachment has no identity {location}")]
    InvalidIdentity {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Requested waveform resolution is zero.
    #[error("Invalid sample count: {requested} {location}")]
    InvalidSampleCount {
        /// Requested number of samples.
        requested: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Scratch directory could not be created or the attachment failed to prepare.
    #[error("Preparation failed: {reason} {location}")]
    PreparationFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Encrypted attachment could not be decrypted.
    #[error("Decryption failed for {identity}: {reason} {location}")]
    DecryptionFailed {
        /// Attachment identity.
        identity: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Source audio could not be converted to the canonical format.
    #[error("Conversion failed for {identity}: {reason} {location}")]
    ConversionFailed {
        /// Attachment identity.
        identity: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Duration of the canonical file could not be determined.
    #[error("Duration probe failed for {path:?}: {reason} {location}")]
    DurationProbeFailed {
        /// Canonical file that was probed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Sampler produced no usable data.
    #[error("Sampling failed for {path:?} ({sample_count} samples): {reason} {location}")]
    SamplingFailed {
        /// Canonical file that was sampled.
        path: PathBuf,
        /// Requested number of samples.
        sample_count: usize,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Request was discarded by a cache clear or cancelled upstream.
    #[error("Request cancelled {location}")]
    Cancelled {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An external stage did not complete within the configured bound.
    #[error("Stage {stage} timed out after {timeout:?} {location}")]
    StageTimeout {
        /// Name of the stage that stalled.
        stage: String,
        /// Configured bound.
        timeout: Duration,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Coordinator was constructed outside a tokio runtime.
    #[error("No async runtime available: {reason} {location}")]
    RuntimeUnavailable {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Configuration loading or validation error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Coarse classification of [`WaveformError`] for callers that branch on the
/// failure category rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`WaveformError::InvalidAttachmentKind`].
    InvalidAttachmentKind,
    /// See [`WaveformError::InvalidIdentity`].
    InvalidIdentity,
    /// See [`WaveformError::InvalidSampleCount`].
    InvalidSampleCount,
    /// See [`WaveformError::PreparationFailed`].
    PreparationFailed,
    /// See [`WaveformError::DecryptionFailed`].
    DecryptionFailed,
    /// See [`WaveformError::ConversionFailed`].
    ConversionFailed,
    /// See [`WaveformError::DurationProbeFailed`].
    DurationProbeFailed,
    /// See [`WaveformError::SamplingFailed`].
    SamplingFailed,
    /// See [`WaveformError::Cancelled`].
    Cancelled,
    /// See [`WaveformError::StageTimeout`].
    Timeout,
    /// Runtime, configuration and IO errors.
    Internal,
}

impl WaveformError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAttachmentKind { .. } => ErrorKind::InvalidAttachmentKind,
            Self::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
            Self::InvalidSampleCount { .. } => ErrorKind::InvalidSampleCount,
            Self::PreparationFailed { .. } => ErrorKind::PreparationFailed,
            Self::DecryptionFailed { .. } => ErrorKind::DecryptionFailed,
            Self::ConversionFailed { .. } => ErrorKind::ConversionFailed,
            Self::DurationProbeFailed { .. } => ErrorKind::DurationProbeFailed,
            Self::SamplingFailed { .. } => ErrorKind::SamplingFailed,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::StageTimeout { .. } => ErrorKind::Timeout,
            Self::RuntimeUnavailable { .. } | Self::ConfigError { .. } | Self::IoError { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// True when the request was dropped rather than failed.
    pub fn is_cancellation(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    #[track_caller]
    pub(crate) fn cancelled() -> Self {
        Self::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for WaveformError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        WaveformError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`WaveformError`].
pub type Result<T> = std::result::Result<T, WaveformError>;

/// Error shared by every caller waiting on the same pipeline execution.
pub type SharedError = Arc<WaveformError>;
