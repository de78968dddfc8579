// Storage client contract consumed by the sync orchestrator. The live
// Google Drive client lives in `drive`, the side-effect free variant in
// `dry_run`.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// A remote folder addressed by its service-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFolderRef {
    pub name: String,
    pub id: String,
}

/// Errors raised by a storage client.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no folder named '{name}' found")]
    NotFound { name: String },

    #[error("{count} folders named '{name}' found, expected exactly one")]
    Ambiguous { name: String, count: usize },

    #[error("remote refused to create folder '{name}'")]
    CreateRejected { name: String },

    #[error("remote refused to upload '{path}'")]
    UploadRejected { path: String },

    #[error("Drive API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether the failed request is worth sending again.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Api { status, .. } => *status == 429 || *status >= 500,
            StorageError::Http(e) => !e.is_builder() && !e.is_decode(),
            _ => false,
        }
    }
}

/// Operations the orchestrator needs from the remote storage service.
///
/// Reads (`resolve_folder_id`, `list_child_folder_names`) always hit the
/// service. Mutations may be simulated, see [`crate::dry_run::DryRunClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Id of the single folder called `name`.
    ///
    /// Fails with `NotFound` when no folder matches and `Ambiguous` when
    /// more than one does.
    async fn resolve_folder_id(&self, name: &str) -> Result<String, StorageError>;

    /// Names of the immediate child folders of `id`. Empty when there are
    /// none.
    async fn list_child_folder_names(&self, id: &str) -> Result<Vec<String>, StorageError>;

    /// Create `name` under `parent_id` and return the new folder id.
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError>;

    /// Upload the local file at `path` under `parent_id` and return the new
    /// file id.
    async fn upload_file(&self, path: &Path, parent_id: &str) -> Result<String, StorageError>;
}
