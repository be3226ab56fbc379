use crate::config::{default_directory_name, default_extension, default_recognized_extensions};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Scratch directory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Parent of the scratch directory (None = platform temp dir).
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,
    /// Name of the scratch subdirectory created under the root.
    #[serde(default = "default_directory_name")]
    pub directory_name: String,
    /// Extension used for canonical files when the source extension is unknown.
    #[serde(default = "default_extension")]
    pub default_extension: String,
    /// Source extensions carried over to the canonical file name.
    #[serde(default = "default_recognized_extensions")]
    pub recognized_extensions: Vec<String>,
}

impl StorageConfig {
    /// Absolute location of the scratch directory.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .join(&self.directory_name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_root: None,
            directory_name: default_directory_name(),
            default_extension: default_extension(),
            recognized_extensions: default_recognized_extensions(),
        }
    }
}
