use crate::{AttachmentKind, StageError};

use std::path::PathBuf;

use async_trait::async_trait;

/// A voice or audio attachment that may still be remote or encrypted.
///
/// Implementations wrap the client's media subsystem. Encrypted attachments
/// are turned into a local file by [`decrypt`](Self::decrypt); plain ones are
/// downloaded by [`prepare`](Self::prepare) and then read from
/// [`cached_file_path`](Self::cached_file_path).
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Content type of the attachment.
    fn kind(&self) -> AttachmentKind;

    /// Stable identity derived from the originating message.
    fn identity(&self) -> Option<String>;

    /// Whether the media must be decrypted before use.
    fn is_encrypted(&self) -> bool;

    /// Decrypt the attachment into a local file and return its path.
    async fn decrypt(&self) -> Result<PathBuf, StageError>;

    /// Fetch an unencrypted attachment into the local media cache.
    async fn prepare(&self) -> Result<(), StageError>;

    /// Local path of a prepared, unencrypted attachment.
    fn cached_file_path(&self) -> PathBuf;
}
