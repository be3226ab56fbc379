/// Snapshot of the coordinator's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Identities with a canonical file and duration.
    pub conversions: usize,
    /// Cached sample arrays across all identities and resolutions.
    pub sample_sets: usize,
    /// Keys with a pipeline execution queued or running.
    pub pending_keys: usize,
    /// Callers waiting on those executions.
    pub pending_waiters: usize,
}
