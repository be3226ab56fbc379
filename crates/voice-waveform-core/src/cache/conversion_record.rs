use std::{path::PathBuf, time::Duration};

/// Canonical file and duration for one attachment identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord {
    /// Canonical file inside the scratch directory.
    pub canonical_path: PathBuf,
    /// Probed playback duration.
    pub duration: Duration,
}
