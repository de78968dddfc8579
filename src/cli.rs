// Command-line surface of the `sauvegarde` binary: two positionals (local
// album root, Drive folder name) and the run switches.

use std::path::PathBuf;

use clap::Parser;

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "sauvegarde",
    version,
    about = "Upload local album folders missing from a Google Drive folder"
)]
pub struct Cli {
    /// Local directory holding one sub-directory per album
    pub source: PathBuf,

    /// Name of the Drive folder the albums belong in
    pub target: String,

    /// Read the remote state but do not create or upload anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only report how many albums are missing remotely
    #[arg(long)]
    pub check: bool,

    /// Choose interactively which missing albums to upload
    #[arg(long)]
    pub select: bool,

    /// Upload only files with this extension (e.g. `.jpg`)
    #[arg(long = "ext", value_name = "EXTENSION")]
    pub extension: Option<String>,

    /// Match `--ext` case-sensitively (default ignores case)
    #[arg(long, requires = "extension")]
    pub ext_case_sensitive: bool,

    /// Also consider album folders whose name starts with a dot
    #[arg(long)]
    pub show_hidden: bool,

    /// Level written to the debug log file (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Service account key file
    #[arg(
        long,
        env = "SAUVEGARDE_CREDENTIALS",
        default_value = "./secrets/google-drive-service-account-credentials.json"
    )]
    pub credentials: String,

    /// Directory receiving sauvegarde-debug.log and sauvegarde-error.log
    #[arg(long, default_value = ".")]
    pub log_dir: String,

    /// Disable the per-folder progress bar
    #[arg(long)]
    pub no_progress_bar: bool,

    /// Retries for transient Drive API failures
    #[arg(long, default_value_t = 2)]
    pub max_retries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "sauvegarde",
            "/media/ssd/albums",
            "Albums",
            "--dry-run",
            "--select",
            "--ext",
            ".jpg",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.source, PathBuf::from("/media/ssd/albums"));
        assert_eq!(cli.target, "Albums");
        assert!(cli.dry_run);
        assert!(cli.select);
        assert!(!cli.check);
        assert_eq!(cli.extension.as_deref(), Some(".jpg"));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.max_retries, 2);
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["sauvegarde", "/albums"]).is_err());
    }

    #[test]
    fn case_sensitivity_needs_an_extension() {
        let result = Cli::try_parse_from(["sauvegarde", "/albums", "Albums", "--ext-case-sensitive"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let result = Cli::try_parse_from(["sauvegarde", "/a", "B", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
