// Dry-run storage client: reads go to the wrapped client so the preview
// reflects the real remote state, mutations are simulated.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::storage::{StorageClient, StorageError};

/// Delay each simulated mutation takes, so a preview run paces like a real one.
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(50);

/// Wraps a live client and turns `create_folder` / `upload_file` into no-ops
/// returning an empty id.
pub struct DryRunClient<C> {
    inner: C,
    delay: Duration,
}

impl<C: StorageClient> DryRunClient<C> {
    pub fn new(inner: C) -> Self {
        Self::with_delay(inner, DEFAULT_SIMULATED_DELAY)
    }

    pub fn with_delay(inner: C, delay: Duration) -> Self {
        Self { inner, delay }
    }

    async fn simulate(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl<C: StorageClient> StorageClient for DryRunClient<C> {
    async fn resolve_folder_id(&self, name: &str) -> Result<String, StorageError> {
        self.inner.resolve_folder_id(name).await
    }

    async fn list_child_folder_names(&self, id: &str) -> Result<Vec<String>, StorageError> {
        self.inner.list_child_folder_names(id).await
    }

    async fn create_folder(&self, name: &str, _parent_id: &str) -> Result<String, StorageError> {
        tracing::warn!(folder = name, "Skipping folder creation because '--dry-run' is set");
        self.simulate().await;
        Ok(String::new())
    }

    async fn upload_file(&self, path: &Path, _parent_id: &str) -> Result<String, StorageError> {
        tracing::debug!(file = %path.display(), "Simulating upload");
        self.simulate().await;
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStorageClient;

    #[tokio::test]
    async fn reads_delegate_to_inner_client() {
        let mut inner = MockStorageClient::new();
        inner
            .expect_resolve_folder_id()
            .times(1)
            .returning(|_| Ok("root-id".to_string()));
        inner
            .expect_list_child_folder_names()
            .times(1)
            .returning(|_| Ok(vec!["B".to_string()]));
        inner.expect_create_folder().never();
        inner.expect_upload_file().never();

        let client = DryRunClient::with_delay(inner, Duration::ZERO);
        assert_eq!(client.resolve_folder_id("Albums").await.unwrap(), "root-id");
        assert_eq!(
            client.list_child_folder_names("root-id").await.unwrap(),
            vec!["B".to_string()]
        );
    }

    #[tokio::test]
    async fn mutations_never_reach_inner_client() {
        let mut inner = MockStorageClient::new();
        inner.expect_create_folder().never();
        inner.expect_upload_file().never();

        let client = DryRunClient::with_delay(inner, Duration::ZERO);
        assert_eq!(client.create_folder("A", "root-id").await.unwrap(), "");
        assert_eq!(
            client
                .upload_file(Path::new("/albums/A/a.jpg"), "")
                .await
                .unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn read_errors_propagate() {
        let mut inner = MockStorageClient::new();
        inner.expect_resolve_folder_id().returning(|name| {
            Err(StorageError::NotFound {
                name: name.to_string(),
            })
        });

        let client = DryRunClient::with_delay(inner, Duration::ZERO);
        let err = client.resolve_folder_id("Albums").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { name } if name == "Albums"));
    }
}
