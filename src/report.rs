// Reporter: how the orchestrator tells the outside world what it is doing.
// The terminal implementation is `ui::ConsoleReporter`.

use std::path::Path;

use crate::storage::StorageError;
use crate::sync::FolderSyncResult;

/// Progress and result events emitted while folders are processed.
///
/// Calls arrive in order from a single task: `on_folder_start`, then either
/// `on_folder_failed` or a series of `report_progress` / file events, and
/// finally `on_folder_done` for every folder.
pub trait Reporter {
    fn on_folder_start(&mut self, folder: &str);

    /// `done` out of `total` files of the current folder have been attempted.
    fn report_progress(&mut self, done: usize, total: usize);

    fn on_file_uploaded(&mut self, folder: &str, file: &Path);

    fn on_file_failed(&mut self, folder: &str, file: &Path, error: &StorageError);

    /// The folder could not be created remotely or listed locally; none of
    /// its files will be attempted.
    fn on_folder_failed(&mut self, folder: &str, error: &str);

    fn on_folder_done(&mut self, result: &FolderSyncResult);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn on_folder_start(&mut self, _folder: &str) {}
    fn report_progress(&mut self, _done: usize, _total: usize) {}
    fn on_file_uploaded(&mut self, _folder: &str, _file: &Path) {}
    fn on_file_failed(&mut self, _folder: &str, _file: &Path, _error: &StorageError) {}
    fn on_folder_failed(&mut self, _folder: &str, _error: &str) {}
    fn on_folder_done(&mut self, _result: &FolderSyncResult) {}
}
