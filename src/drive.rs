// Google Drive client: the live `StorageClient`. Talks to the Drive v3 REST
// API with an async reqwest client, one request at a time, retrying
// transient failures with backoff.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_LENGTH, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::auth::TokenSource;
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::storage::{StorageClient, StorageError};

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Mime type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Drive API upper bound for `pageSize`.
const MAX_PAGE_SIZE: u32 = 1000;

/// One page of a `files.list` call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilesListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

/// Body of `files.create`, also sent when opening an upload session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    parents: [&'a str; 1],
}

/// `files.create` answer, `id` is the only field requested.
#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: Option<String>,
}

/// Escape a value for use inside a single-quoted Drive query literal.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn folder_by_name_query(name: &str) -> String {
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escape_query_value(name),
        FOLDER_MIME_TYPE
    )
}

fn child_folders_query(parent_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType = '{}' and trashed = false",
        escape_query_value(parent_id),
        FOLDER_MIME_TYPE
    )
}

/// Turn a non-2xx response into `StorageError::Api` with the body as message.
async fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Live Drive client. Cheap to share: the inner reqwest client is pooled.
pub struct DriveClient {
    http: Client,
    tokens: Arc<dyn TokenSource>,
    retry: RetryConfig,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    pub fn new(tokens: Arc<dyn TokenSource>, retry: RetryConfig) -> Result<Self, StorageError> {
        let http = Client::builder()
            .user_agent(concat!("sauvegarde/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            tokens,
            retry,
            api_base: DRIVE_API_BASE.to_string(),
            upload_base: DRIVE_UPLOAD_BASE.to_string(),
        })
    }

    /// Point the client at another endpoint, e.g. a local emulator.
    pub fn with_base_urls(mut self, api_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.upload_base = upload_base.into();
        self
    }

    /// Send the request built by `build` once, with a fresh bearer token.
    async fn send_once<F>(&self, build: &F) -> Result<Response, StorageError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self.tokens.access_token().await?;
        let response = build(&self.http).bearer_auth(token).send().await?;
        check_status(response).await
    }

    /// `send_once`, retrying transient failures.
    async fn send<F>(&self, build: F) -> Result<Response, StorageError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let build = &build;
        retry_with_backoff(&self.retry, StorageError::is_retryable, move || {
            self.send_once(build)
        })
        .await
    }

    /// Every file matching `query`, across all result pages.
    async fn list_files(&self, query: &str) -> Result<Vec<DriveFile>, StorageError> {
        let url = format!("{}/files", self.api_base);
        let page_size = MAX_PAGE_SIZE.to_string();
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let response = self
                .send(|http| {
                    let mut params = vec![
                        ("q", query),
                        ("pageSize", page_size.as_str()),
                        ("fields", "nextPageToken, files(id, name)"),
                        ("supportsAllDrives", "true"),
                        ("includeItemsFromAllDrives", "true"),
                    ];
                    if let Some(token) = page_token.as_deref() {
                        params.push(("pageToken", token));
                    }
                    http.get(&url).query(&params)
                })
                .await?;
            let page: FilesListResponse = serde_json::from_slice(&response.bytes().await?)?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(query, count = files.len(), "Listed Drive files");
        Ok(files)
    }

    /// One attempt at a resumable upload: open the session, then stream the
    /// file body to it. The caller owns retries for the whole sequence.
    async fn upload_once(&self, path: &Path, parent_id: &str) -> Result<Option<String>, StorageError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = tokio::fs::metadata(path).await?.len();

        let url = format!("{}/files", self.upload_base);
        let metadata = FileMetadata {
            name: &file_name,
            mime_type: None,
            parents: [parent_id],
        };
        let session = self
            .send_once(&|http: &Client| {
                http.post(&url)
                    .query(&[
                        ("uploadType", "resumable"),
                        ("fields", "id"),
                        ("supportsAllDrives", "true"),
                    ])
                    .header("X-Upload-Content-Length", size.to_string())
                    .json(&metadata)
            })
            .await?;
        let Some(session_url) = session
            .headers()
            .get(LOCATION)
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .map(str::to_string)
        else {
            return Ok(None);
        };

        // The session URL carries its own credentials and is not retried:
        // a failed PUT restarts the whole upload.
        let file = tokio::fs::File::open(path).await?;
        let response = self
            .http
            .put(&session_url)
            .header(CONTENT_LENGTH, size.to_string())
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;
        let response = check_status(response).await?;
        let created: CreatedFile = serde_json::from_slice(&response.bytes().await?)?;
        Ok(created.id.filter(|id| !id.is_empty()))
    }
}

#[async_trait]
impl StorageClient for DriveClient {
    async fn resolve_folder_id(&self, name: &str) -> Result<String, StorageError> {
        let mut matches = self.list_files(&folder_by_name_query(name)).await?;
        match matches.len() {
            0 => Err(StorageError::NotFound {
                name: name.to_string(),
            }),
            1 => Ok(matches.remove(0).id),
            count => Err(StorageError::Ambiguous {
                name: name.to_string(),
                count,
            }),
        }
    }

    async fn list_child_folder_names(&self, id: &str) -> Result<Vec<String>, StorageError> {
        let children = self.list_files(&child_folders_query(id)).await?;
        if children.is_empty() {
            tracing::info!(folder_id = id, "No child folders found");
        }
        Ok(children.into_iter().map(|f| f.name).collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        let url = format!("{}/files", self.api_base);
        let metadata = FileMetadata {
            name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: [parent_id],
        };
        let response = self
            .send(|http| {
                http.post(&url)
                    .query(&[("fields", "id"), ("supportsAllDrives", "true")])
                    .json(&metadata)
            })
            .await?;
        let created: CreatedFile = serde_json::from_slice(&response.bytes().await?)?;
        match created.id.filter(|id| !id.is_empty()) {
            Some(id) => {
                tracing::debug!(folder = name, id = %id, "Created folder");
                Ok(id)
            }
            None => Err(StorageError::CreateRejected {
                name: name.to_string(),
            }),
        }
    }

    async fn upload_file(&self, path: &Path, parent_id: &str) -> Result<String, StorageError> {
        let id = retry_with_backoff(&self.retry, StorageError::is_retryable, move || {
            self.upload_once(path, parent_id)
        })
        .await?;
        id.ok_or_else(|| StorageError::UploadRejected {
            path: path.display().to_string(),
        })
    }
}
