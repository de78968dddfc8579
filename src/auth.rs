// Access tokens for the Drive API, minted from a service-account key file.

use std::path::Path;

use async_trait::async_trait;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

use crate::storage::StorageError;

/// Full Drive scope: the tool lists, creates and uploads.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Supplies a bearer token for each API request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, StorageError>;
}

/// Tokens for a Google service account. Refresh is handled by the
/// authenticator, which caches the token until it expires.
pub struct ServiceAccountTokens {
    auth: DefaultAuthenticator,
}

impl ServiceAccountTokens {
    /// Read the JSON key at `key_file` and build the authenticator.
    pub async fn from_key_file(key_file: &Path) -> Result<Self, StorageError> {
        let key = yup_oauth2::read_service_account_key(key_file)
            .await
            .map_err(|e| {
                StorageError::Auth(format!(
                    "cannot read service account key {}: {e}",
                    key_file.display()
                ))
            })?;
        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| StorageError::Auth(e.to_string()))?;
        tracing::debug!(key_file = %key_file.display(), "Service account authenticator ready");
        Ok(Self { auth })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<String, StorageError> {
        let token = self
            .auth
            .token(&[DRIVE_SCOPE])
            .await
            .map_err(|e| StorageError::Auth(e.to_string()))?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| StorageError::Auth("token response carried no access token".into()))
    }
}

/// A fixed token.
#[cfg(test)]
pub struct StaticToken(pub String);

#[cfg(test)]
#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, StorageError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_file_is_an_auth_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ServiceAccountTokens::from_key_file(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(StorageError::Auth(msg)) if msg.contains("absent.json")));
    }

    #[tokio::test]
    async fn static_token_is_returned_as_is() {
        let source = StaticToken("abc".into());
        assert_eq!(source.access_token().await.unwrap(), "abc");
    }
}
