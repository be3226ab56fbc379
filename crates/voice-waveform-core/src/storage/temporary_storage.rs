//! Scratch directory for canonical audio files.
//!
//! The directory is created on demand and removed as a whole when the cache
//! is cleared. File names are derived from the attachment identity, so a file
//! left behind by an earlier run is picked up instead of converted again.

use crate::{StorageConfig, WaveformError, error::Result as CoreResult};

use std::{
    fs,
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Owner of the scratch directory.
#[derive(Debug, Clone)]
pub struct TemporaryStorage {
    root: PathBuf,
    default_extension: String,
    recognized_extensions: Vec<String>,
}

impl TemporaryStorage {
    /// Storage rooted at the configured scratch directory. Nothing is created yet.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.scratch_dir(),
            default_extension: config.default_extension.to_ascii_lowercase(),
            recognized_extensions: config
                .recognized_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Scratch directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the scratch directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PreparationFailed` if the directory cannot be created.
    #[track_caller]
    pub fn ensure_created(&self) -> CoreResult<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|e| WaveformError::PreparationFailed {
            reason: format!("Failed to create scratch directory {:?}: {}", self.root, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(scratch_dir = ?self.root, "Created scratch directory");

        Ok(())
    }

    /// Deterministic canonical file location for an identity.
    ///
    /// The source extension is kept when recognized, otherwise the configured
    /// default container extension is used.
    pub fn canonical_path(&self, identity: &str, source: &Path) -> PathBuf {
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| self.recognized_extensions.contains(ext))
            .unwrap_or_else(|| self.default_extension.clone());

        self.root
            .join(format!("{}.{}", file_stem_for(identity), extension))
    }

    /// Remove a single canonical file. Missing files are not an error.
    pub fn remove_file(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = ?path, "Removed canonical file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?path, error = %e, "Failed to remove canonical file"),
        }
    }

    /// Move the scratch directory aside for deletion.
    ///
    /// Returns the new location of the tree, or `None` when there was
    /// nothing to move. If the rename fails the tree is deleted in place.
    pub fn detach(&self) -> Option<PathBuf> {
        let mut staged = self.root.clone().into_os_string();
        staged.push(format!(".cleared-{}", Uuid::new_v4()));
        let staged = PathBuf::from(staged);

        match fs::rename(&self.root, &staged) {
            Ok(()) => {
                debug!(scratch_dir = ?self.root, staged = ?staged, "Scratch directory detached");
                Some(staged)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(scratch_dir = ?self.root, "Scratch directory already absent");
                None
            }
            Err(e) => {
                warn!(scratch_dir = ?self.root, error = %e, "Failed to detach scratch directory");
                self.wipe();
                None
            }
        }
    }

    /// Delete the scratch directory tree in place. Failures are logged, not returned.
    pub fn wipe(&self) {
        Self::remove_tree(&self.root);
    }

    /// Delete a directory tree. Failures are logged, not returned.
    pub fn remove_tree(dir: &Path) {
        match fs::remove_dir_all(dir) {
            Ok(()) => info!(dir = ?dir, "Scratch directory removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = ?dir, "Scratch directory already absent")
            }
            Err(e) => warn!(dir = ?dir, error = %e, "Failed to remove scratch directory"),
        }
    }
}

/// Map an identity onto a single file-name component.
///
/// A leading dot is replaced so the file is never hidden.
pub(crate) fn file_stem_for(identity: &str) -> String {
    identity
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            '.' if i > 0 => c,
            _ => '_',
        })
        .collect()
}
