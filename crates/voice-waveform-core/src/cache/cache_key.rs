use std::fmt;

/// Attachment identity paired with a requested waveform resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Attachment identity.
    pub identity: String,
    /// Number of samples requested.
    pub sample_count: usize,
}

impl CacheKey {
    /// Build a key.
    pub fn new(identity: impl Into<String>, sample_count: usize) -> Self {
        Self {
            identity: identity.into(),
            sample_count,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.sample_count)
    }
}
