//! crates/ts_cli/src/args.rs
//! Command-line surface of `tsheet`.
//!
//! Paths must be local; any `scheme://` path is rejected before the roster
//! is opened.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::Level;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "tsheet",
    version,
    disable_help_subcommand = true,
    about = "Lay out tournament spreadsheets from a team roster"
)]
pub struct Args {
    /// Roster CSV with header `division,team[,pool]`.
    #[arg(long)]
    pub roster: PathBuf,

    /// Tournament config JSON. Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory for the workbook and run artifacts.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Report format(s) to emit. Omit to skip the report.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Validate the roster and config, print the report, write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Auto-fit team columns and write the measured widths to `tournament.fitted.json`.
    #[arg(long)]
    pub retrofit_widths: bool,

    /// Log level on stderr.
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Only log errors.
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    pub fn level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.log_level.as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CliError {
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
        }
    }
}

impl std::error::Error for CliError {}

fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if has_scheme(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

/// Reject non-local paths among every path flag.
pub fn check_paths(args: &Args) -> Result<(), CliError> {
    [Some(args.roster.as_path()), args.config.as_deref(), Some(args.out.as_path())]
        .into_iter()
        .flatten()
        .try_for_each(ensure_local_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["tsheet", "--roster", "teams.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let a = parse(&[]);
        assert_eq!(a.out, PathBuf::from("."));
        assert!(a.render.is_empty());
        assert_eq!(a.level(), Level::INFO);
    }

    #[test]
    fn quiet_wins_over_log_level() {
        assert_eq!(parse(&["--log-level", "debug", "--quiet"]).level(), Level::ERROR);
        assert_eq!(parse(&["--log-level", "warn"]).level(), Level::WARN);
    }

    #[test]
    fn unknown_renderer_is_rejected() {
        assert!(Args::try_parse_from(["tsheet", "--roster", "t.csv", "--render", "pdf"]).is_err());
    }

    #[test]
    fn remote_paths_are_rejected() {
        let a = parse(&["--config", "https://example.org/t.json"]);
        assert!(matches!(check_paths(&a), Err(CliError::NonLocalPath(_))));
        assert!(check_paths(&parse(&[])).is_ok());
    }
}
