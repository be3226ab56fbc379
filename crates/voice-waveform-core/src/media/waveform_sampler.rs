use std::path::Path;

use async_trait::async_trait;

/// Produces a fixed-length amplitude summary of an audio file.
#[async_trait]
pub trait WaveformSampler: Send + Sync {
    /// Return `count` normalized amplitudes for `file`, or `None` on failure.
    async fn sample(&self, file: &Path, count: usize) -> Option<Vec<f32>>;
}
