// UI layer: the terminal side of selection and progress.
// - `PromptSelector` shows a `dialoguer` multi-select over the missing folders.
// - `ConsoleReporter` draws one `indicatif` bar per folder and prints
//   colored result lines through `console`.

use std::io;
use std::io::IsTerminal;
use std::path::Path;

use dialoguer::MultiSelect;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::console;
use crate::report::Reporter;
use crate::select::{pick_in_order, Selector};
use crate::storage::StorageError;
use crate::sync::FolderSyncResult;

/// Interactive multi-select. Space toggles, Enter confirms; nothing is
/// checked up front.
#[derive(Debug, Default)]
pub struct PromptSelector;

impl Selector for PromptSelector {
    fn select_subset(&mut self, candidates: &[String]) -> io::Result<Vec<String>> {
        let picked = MultiSelect::new()
            .with_prompt("Folders to upload")
            .items(candidates)
            .interact()?;
        Ok(pick_in_order(candidates, &picked))
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Terminal reporter used by the binary.
pub struct ConsoleReporter {
    show_progress: bool,
    dry_run: bool,
    bar: Option<ProgressBar>,
    current: String,
}

impl ConsoleReporter {
    /// `show_progress` is ignored when stderr is not a terminal.
    pub fn new(show_progress: bool, dry_run: bool) -> Self {
        Self {
            show_progress: show_progress && io::stderr().is_terminal(),
            dry_run,
            bar: None,
            current: String::new(),
        }
    }

    /// Print through the bar when one is drawn so lines don't tear it.
    fn line(&self, print: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn on_folder_start(&mut self, folder: &str) {
        self.current = folder.to_string();
        console::info(format!("Processing {folder}"));
    }

    fn report_progress(&mut self, done: usize, total: usize) {
        if !self.show_progress {
            return;
        }
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
            bar.set_style(bar_style());
            bar
        });
        bar.set_length(total as u64);
        bar.set_message(self.current.clone());
        bar.set_position(done as u64);
    }

    fn on_file_uploaded(&mut self, _folder: &str, _file: &Path) {}

    fn on_file_failed(&mut self, folder: &str, file: &Path, error: &StorageError) {
        let message = format!("[{folder}] failed to upload {}: {error}", file.display());
        self.line(|| console::error(message));
    }

    fn on_folder_failed(&mut self, folder: &str, error: &str) {
        let message = format!("[{folder}] skipped: {error}");
        self.line(|| console::error(message));
    }

    fn on_folder_done(&mut self, result: &FolderSyncResult) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        if !result.is_processed() {
            return;
        }
        let suffix = if self.dry_run { " (dry run)" } else { "" };
        let message = format!(
            "{}: {}/{} files uploaded{suffix}",
            result.folder, result.files_uploaded, result.files_total
        );
        if result.failed_files.is_empty() {
            console::success(message);
        } else {
            console::warn(message);
        }
    }
}
