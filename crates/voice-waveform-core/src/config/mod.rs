mod cache_config;
mod storage_config;
mod worker_config;

pub use {
    cache_config::CacheConfig, storage_config::StorageConfig, worker_config::WorkerConfig,
};

pub(crate) const DEFAULT_DIRECTORY_NAME: &str = "voice-waveforms";
pub(crate) const DEFAULT_EXTENSION: &str = "m4a";
pub(crate) const DEFAULT_RECOGNIZED_EXTENSIONS: [&str; 9] = [
    "m4a", "mp4", "aac", "ogg", "opus", "mp3", "wav", "caf", "flac",
];
pub(crate) const DEFAULT_STAGE_TIMEOUT_MS: u64 = 30_000;
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 64;

pub(crate) fn default_directory_name() -> String {
    DEFAULT_DIRECTORY_NAME.to_string()
}

pub(crate) fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

pub(crate) fn default_recognized_extensions() -> Vec<String> {
    DEFAULT_RECOGNIZED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

pub(crate) fn default_stage_timeout_ms() -> Option<u64> {
    Some(DEFAULT_STAGE_TIMEOUT_MS)
}

pub(crate) fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
