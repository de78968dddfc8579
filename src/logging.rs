// Structured logging: every `tracing` event of a run lands in two append-only
// JSON files next to each other, one for the whole run at the chosen level
// and one for errors only. The console is left to `console` and `ui`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::cli::LogLevel;

pub const DEBUG_LOG_FILE: &str = "sauvegarde-debug.log";
pub const ERROR_LOG_FILE: &str = "sauvegarde-error.log";

/// Target of events emitted by the `sauvegarde` binary itself.
const BINARY_TARGET: &str = "sauvegarde";

/// Directives for the run log: the library and the binary at `level`,
/// dependencies at warn.
fn default_directives(level: LogLevel) -> String {
    let level = level.as_str();
    format!(
        "warn,{}={level},{BINARY_TARGET}={level}",
        env!("CARGO_CRATE_NAME")
    )
}

/// Filter for the run log. `RUST_LOG` replaces the defaults entirely when
/// set.
pub fn run_log_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn open_append(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(level: LogLevel, log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;
    let run_log = open_append(&log_dir.join(DEBUG_LOG_FILE))?;
    let error_log = open_append(&log_dir.join(ERROR_LOG_FILE))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(run_log))
                .with_filter(run_log_filter(level)),
        )
        .with(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(error_log))
                .with_filter(LevelFilter::ERROR),
        )
        .try_init()
        .context("logging already initialized")?;
    Ok(())
}
