// Run configuration resolved from the parsed command line: paths expanded,
// extension normalized, source checked before anything touches the network.

use std::path::PathBuf;

use anyhow::bail;

use crate::cli::{Cli, LogLevel};
use crate::local::{CaseSensitivity, ExtensionFilter};
use crate::retry::RetryConfig;
use crate::sync::SyncRequest;

/// Resolved configuration for one run.
pub struct Config {
    pub source: PathBuf,
    pub target: String,
    pub credentials: PathBuf,
    pub log_dir: PathBuf,
    pub extension: Option<ExtensionFilter>,
    pub retry: RetryConfig,
    pub log_level: LogLevel,
    pub dry_run: bool,
    pub check_only: bool,
    pub select: bool,
    pub show_hidden: bool,
    pub show_progress: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("credentials", &self.credentials)
            .field("extension", &self.extension)
            .field("dry_run", &self.dry_run)
            .field("check_only", &self.check_only)
            .field("select", &self.select)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let source = cli.source.to_str().map(expand_tilde).unwrap_or(cli.source);
        if !source.is_dir() {
            bail!("source {} is not a directory", source.display());
        }

        let case = if cli.ext_case_sensitive {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        };
        let extension = match cli.extension.as_deref().map(str::trim) {
            Some("") => bail!("--ext needs a non-empty extension"),
            Some(ext) => Some(ExtensionFilter::new(ext, case)),
            None => None,
        };

        Ok(Self {
            source,
            target: cli.target,
            credentials: expand_tilde(&cli.credentials),
            log_dir: expand_tilde(&cli.log_dir),
            extension,
            retry: RetryConfig {
                max_retries: cli.max_retries,
                ..RetryConfig::default()
            },
            log_level: cli.log_level,
            dry_run: cli.dry_run,
            check_only: cli.check,
            select: cli.select,
            show_hidden: cli.show_hidden,
            show_progress: !cli.no_progress_bar,
        })
    }

    /// The part of the configuration the orchestrator consumes.
    pub fn sync_request(&self) -> SyncRequest {
        SyncRequest {
            source: self.source.clone(),
            target: self.target.clone(),
            show_hidden: self.show_hidden,
            check_only: self.check_only,
            extension: self.extension.clone(),
        }
    }
}
