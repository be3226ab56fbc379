use crate::{ErrorKind, StorageConfig, TemporaryStorage, storage::temporary_storage::file_stem_for};

use std::path::Path;

use tempfile::TempDir;

fn storage_in(dir: &TempDir) -> TemporaryStorage {
    TemporaryStorage::new(&StorageConfig {
        scratch_root: Some(dir.path().to_path_buf()),
        ..StorageConfig::default()
    })
}

/// WHAT: Recognized source extensions are kept, lowercased
/// WHY: Canonical names must be deterministic per identity and container
#[test]
#[allow(clippy::unwrap_used)]
fn given_recognized_extension_when_naming_canonical_file_then_extension_kept() {
    // Given: Storage with default settings
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    // When: Naming files for .OGG and .mp3 sources
    let ogg = storage.canonical_path("evt1", Path::new("/media/voice.OGG"));
    let mp3 = storage.canonical_path("evt1", Path::new("/media/song.mp3"));

    // Then: Extensions carried over in lowercase
    assert_eq!(ogg, storage.path().join("evt1.ogg"));
    assert_eq!(mp3, storage.path().join("evt1.mp3"));
}

/// WHAT: Unknown or missing extensions fall back to the default container
/// WHY: The converter always needs a container it can write
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_extension_when_naming_canonical_file_then_default_extension_used() {
    // Given: Storage with default settings
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    // When: Naming files for .bin and extensionless sources
    let bin = storage.canonical_path("evt1", Path::new("/media/blob.bin"));
    let bare = storage.canonical_path("evt1", Path::new("/media/blob"));

    // Then: Default container extension
    assert_eq!(bin, storage.path().join("evt1.m4a"));
    assert_eq!(bare, storage.path().join("evt1.m4a"));
}

/// WHAT: Identities become a single safe file-name component
/// WHY: Event identifiers contain characters such as '$', ':' and '/'
#[test]
fn given_identity_with_separators_when_building_file_stem_then_sanitized() {
    assert_eq!(file_stem_for("$abc:matrix.org"), "_abc_matrix.org");
    assert_eq!(file_stem_for("../../etc/passwd"), "_._.._etc_passwd");
    assert_eq!(file_stem_for(".hidden"), "_hidden");
    assert_eq!(file_stem_for("plain-id_42"), "plain-id_42");
}

/// WHAT: The scratch directory is created on demand and wiped recursively
/// WHY: Cache clears must leave no converted files behind
#[test]
#[allow(clippy::unwrap_used)]
fn given_populated_scratch_directory_when_wiping_then_tree_removed() {
    // Given: A scratch directory with a canonical file
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.ensure_created().unwrap();
    let file = storage.canonical_path("evt1", Path::new("a.ogg"));
    std::fs::write(&file, b"data").unwrap();

    // When: Wiping twice
    storage.wipe();
    storage.wipe();

    // Then: Directory gone, second wipe harmless
    assert!(!storage.path().exists());
}

/// WHAT: Detaching moves the tree aside and frees the live path at once
/// WHY: Clears hold the coordinator lock only for the rename, not the delete
#[test]
#[allow(clippy::unwrap_used)]
fn given_populated_scratch_directory_when_detaching_then_live_path_free_and_tree_removable() {
    // Given: A scratch directory with a canonical file
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.ensure_created().unwrap();
    let file = storage.canonical_path("evt1", Path::new("a.ogg"));
    std::fs::write(&file, b"data").unwrap();

    // When: Detaching
    let staged = storage.detach().unwrap();

    // Then: The live path is gone, the file moved with the tree
    assert!(!storage.path().exists());
    assert!(staged.join(file.file_name().unwrap()).is_file());
    assert_eq!(staged.parent(), storage.path().parent());

    // And: The staged tree can be removed, and a second detach finds nothing
    TemporaryStorage::remove_tree(&staged);
    assert!(!staged.exists());
    assert_eq!(storage.detach(), None);
}

/// WHAT: Removing a missing canonical file is not an error
/// WHY: Eviction may race with an external cleanup
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_removing_then_no_panic_and_directory_intact() {
    // Given: An empty scratch directory
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.ensure_created().unwrap();

    // When: Removing a file that was never written
    storage.remove_file(&storage.path().join("missing.m4a"));

    // Then: Directory still present
    assert!(storage.path().is_dir());
}

/// WHAT: A file in place of the scratch root fails creation
/// WHY: Surfaced to callers as PreparationFailed
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_blocking_root_when_creating_then_preparation_failed() {
    // Given: The scratch root is a regular file
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let storage = TemporaryStorage::new(&StorageConfig {
        scratch_root: Some(blocker),
        ..StorageConfig::default()
    });

    // When: Creating the directory
    let result = storage.ensure_created();

    // Then: PreparationFailed
    assert_eq!(result.unwrap_err().kind(), ErrorKind::PreparationFailed);
}
