// Sync orchestrator.
//
// A run goes through these steps, strictly one at a time:
//
// 1. resolve the remote target folder by name,
// 2. diff the local album folders against the target's children (once),
// 3. stop here in check-only mode,
// 4. let the `Selector` narrow the candidates,
// 5. for each selected album: create the remote folder, list and filter
//    its local files, upload them one by one.
//
// Only steps 1, 2 and 4 can fail the run. A folder that cannot be created
// is skipped without any upload attempt; a file that cannot be uploaded is
// recorded and its siblings are still attempted.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Instrument;

use crate::diff::compute_missing;
use crate::local::{self, ExtensionFilter};
use crate::report::Reporter;
use crate::select::Selector;
use crate::storage::{RemoteFolderRef, StorageClient, StorageError};

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot resolve remote folder '{target}': {source}")]
    Resolution {
        target: String,
        #[source]
        source: StorageError,
    },

    #[error("cannot list the children of remote folder '{target}': {source}")]
    RemoteListing {
        target: String,
        #[source]
        source: StorageError,
    },

    #[error("cannot list album folders in {}: {source}", .path.display())]
    LocalInventory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("folder selection failed: {0}")]
    Selection(#[source] std::io::Error),
}

/// What to sync and how.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub source: PathBuf,
    pub target: String,
    pub show_hidden: bool,
    pub check_only: bool,
    pub extension: Option<ExtensionFilter>,
}

/// The remote target and the albums it lacks, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub target: RemoteFolderRef,
    pub missing: Vec<String>,
}

/// A file that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file: PathBuf,
    pub error: String,
}

/// Outcome of one album folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSyncResult {
    pub folder: String,
    pub files_total: usize,
    pub files_uploaded: usize,
    pub folder_created: bool,
    pub failed_files: Vec<FileFailure>,
    /// Why the folder was skipped, when it was.
    pub error: Option<String>,
}

impl FolderSyncResult {
    fn new(folder: &str) -> Self {
        Self {
            folder: folder.to_string(),
            files_total: 0,
            files_uploaded: 0,
            folder_created: false,
            failed_files: Vec::new(),
            error: None,
        }
    }

    /// The folder was created and its file list attempted.
    pub fn is_processed(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Folders missing remotely, before selection.
    pub missing: usize,
    /// Folders handed to the processing loop.
    pub candidates: usize,
    pub folders: Vec<FolderSyncResult>,
}

impl RunSummary {
    /// Folders were missing but the selection kept none of them.
    pub fn nothing_selected(&self) -> bool {
        self.missing > 0 && self.candidates == 0
    }

    pub fn folders_processed(&self) -> usize {
        self.folders.iter().filter(|f| f.is_processed()).count()
    }

    pub fn folders_failed(&self) -> usize {
        self.folders.len() - self.folders_processed()
    }

    pub fn files_uploaded(&self) -> usize {
        self.folders.iter().map(|f| f.files_uploaded).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.folders.iter().map(|f| f.failed_files.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `--check`: nothing was mutated.
    CheckOnly { missing: Vec<String> },
    Completed(RunSummary),
}

/// Resolve the target and compute the missing albums.
pub async fn plan(
    storage: &dyn StorageClient,
    source: &Path,
    target: &str,
    show_hidden: bool,
) -> Result<SyncPlan, SyncError> {
    let target_id = storage
        .resolve_folder_id(target)
        .await
        .map_err(|source| SyncError::Resolution {
            target: target.to_string(),
            source,
        })?;
    tracing::debug!(folder = target, id = %target_id, "Resolved remote target");

    let albums = local::list_album_folders(source, show_hidden).map_err(|e| {
        SyncError::LocalInventory {
            path: source.to_path_buf(),
            source: e,
        }
    })?;
    let remote = storage
        .list_child_folder_names(&target_id)
        .await
        .map_err(|source| SyncError::RemoteListing {
            target: target.to_string(),
            source,
        })?;

    let missing = compute_missing(&albums, &remote);
    tracing::info!(
        local = albums.len(),
        remote = remote.len(),
        missing = missing.len(),
        "Computed missing folders"
    );

    Ok(SyncPlan {
        target: RemoteFolderRef {
            name: target.to_string(),
            id: target_id,
        },
        missing,
    })
}

/// Run the whole pipeline for `request`.
pub async fn run(
    request: &SyncRequest,
    storage: &dyn StorageClient,
    selector: &mut dyn Selector,
    reporter: &mut dyn Reporter,
) -> Result<RunOutcome, SyncError> {
    let plan = plan(storage, &request.source, &request.target, request.show_hidden).await?;

    if request.check_only {
        return Ok(RunOutcome::CheckOnly {
            missing: plan.missing,
        });
    }

    let selection = if plan.missing.is_empty() {
        Vec::new()
    } else {
        selector
            .select_subset(&plan.missing)
            .map_err(SyncError::Selection)?
    };

    let orchestrator = Orchestrator {
        storage,
        source: &request.source,
        extension: request.extension.as_ref(),
    };
    let mut summary = orchestrator
        .process_folders(&plan.target, &selection, reporter)
        .await;
    summary.missing = plan.missing.len();
    Ok(RunOutcome::Completed(summary))
}

/// Drives folder creation and uploads for a fixed selection.
pub struct Orchestrator<'a> {
    pub storage: &'a dyn StorageClient,
    pub source: &'a Path,
    pub extension: Option<&'a ExtensionFilter>,
}

impl Orchestrator<'_> {
    /// Process `selection` in order. Never fails: per-folder and per-file
    /// errors are recorded in the summary.
    pub async fn process_folders(
        &self,
        target: &RemoteFolderRef,
        selection: &[String],
        reporter: &mut dyn Reporter,
    ) -> RunSummary {
        let mut summary = RunSummary {
            missing: selection.len(),
            candidates: selection.len(),
            folders: Vec::with_capacity(selection.len()),
        };

        for folder in selection {
            let span = tracing::info_span!("folder", name = %folder);
            let result = self
                .process_folder(folder, &target.id, reporter)
                .instrument(span)
                .await;
            reporter.on_folder_done(&result);
            summary.folders.push(result);
        }

        tracing::info!(
            processed = summary.folders_processed(),
            candidates = summary.candidates,
            files_uploaded = summary.files_uploaded(),
            files_failed = summary.files_failed(),
            "Sync finished"
        );
        summary
    }

    async fn process_folder(
        &self,
        folder: &str,
        parent_id: &str,
        reporter: &mut dyn Reporter,
    ) -> FolderSyncResult {
        let mut result = FolderSyncResult::new(folder);
        reporter.on_folder_start(folder);

        let folder_id = match self.storage.create_folder(folder, parent_id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(folder, error = %e, "Folder creation failed, skipping its files");
                reporter.on_folder_failed(folder, &e.to_string());
                result.error = Some(e.to_string());
                return result;
            }
        };
        result.folder_created = true;

        let files = match local::list_files(&self.source.join(folder)) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(folder, error = %e, "Cannot list local files");
                reporter.on_folder_failed(folder, &e.to_string());
                result.error = Some(e.to_string());
                return result;
            }
        };
        let files = match self.extension {
            Some(filter) => filter.apply(files),
            None => files,
        };
        result.files_total = files.len();
        reporter.report_progress(0, files.len());

        for (done, file) in files.iter().enumerate() {
            match self.storage.upload_file(file, &folder_id).await {
                Ok(id) => {
                    tracing::debug!(file = %file.display(), id = %id, "Uploaded");
                    result.files_uploaded += 1;
                    reporter.on_file_uploaded(folder, file);
                }
                Err(e) => {
                    tracing::error!(file = %file.display(), error = %e, "Upload failed");
                    reporter.on_file_failed(folder, file, &e);
                    result.failed_files.push(FileFailure {
                        file: file.clone(),
                        error: e.to_string(),
                    });
                }
            }
            reporter.report_progress(done + 1, files.len());
        }

        result
    }
}
