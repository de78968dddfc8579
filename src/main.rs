// Entrypoint for the `sauvegarde` CLI.
// - Parse arguments, set up the log files, pick the storage client once.
// - Hand everything to `sync::run` and map the outcome to an exit code:
//   0 for completed runs (even with per-folder or per-file failures) and
//   check-only runs, 1 for fatal errors.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use sauvegarde_cli::auth::ServiceAccountTokens;
use sauvegarde_cli::cli::Cli;
use sauvegarde_cli::config::Config;
use sauvegarde_cli::drive::DriveClient;
use sauvegarde_cli::dry_run::DryRunClient;
use sauvegarde_cli::select::{AllFolders, Selector};
use sauvegarde_cli::storage::StorageClient;
use sauvegarde_cli::sync::{self, RunOutcome, RunSummary};
use sauvegarde_cli::ui::{ConsoleReporter, PromptSelector};
use sauvegarde_cli::{console, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            console::fatal(format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(config.log_level, &config.log_dir) {
        console::fatal(format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Run aborted");
            console::fatal(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!(?config, "Starting sauvegarde");

    let tokens = ServiceAccountTokens::from_key_file(&config.credentials).await?;
    let live = DriveClient::new(Arc::new(tokens), config.retry.clone())?;
    let storage: Box<dyn StorageClient> = if config.dry_run {
        console::warn("Dry run: nothing will be created or uploaded");
        Box::new(DryRunClient::new(live))
    } else {
        Box::new(live)
    };
    let mut selector: Box<dyn Selector> = if config.select {
        Box::new(PromptSelector)
    } else {
        Box::new(AllFolders)
    };
    let mut reporter = ConsoleReporter::new(config.show_progress, config.dry_run);

    let outcome = sync::run(
        &config.sync_request(),
        storage.as_ref(),
        selector.as_mut(),
        &mut reporter,
    )
    .await?;

    match outcome {
        RunOutcome::CheckOnly { missing } => {
            for name in &missing {
                console::info(format!("  {name}"));
            }
            console::success(format!(
                "{} folder(s) missing from '{}'",
                missing.len(),
                config.target
            ));
        }
        RunOutcome::Completed(summary) => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if summary.nothing_selected() {
        console::warn(format!(
            "No folder selected, {} missing folder(s) left as they are",
            summary.missing
        ));
        return;
    }
    if summary.candidates == 0 {
        console::success("Nothing to sync");
        return;
    }
    let line = format!(
        "{}/{} folders processed, {} files uploaded",
        summary.folders_processed(),
        summary.candidates,
        summary.files_uploaded()
    );
    if summary.folders_failed() == 0 && summary.files_failed() == 0 {
        console::success(line);
    } else {
        console::warn(format!(
            "{line}, {} folders skipped, {} files failed (see {})",
            summary.folders_failed(),
            summary.files_failed(),
            logging::ERROR_LOG_FILE
        ));
    }
}
