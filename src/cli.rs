//! Command-line interface definitions for the dashboard.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every setting is optional here; anything left unset falls back to the
//! config file (if given) and then to the built-in defaults, see
//! [`crate::config::DashboardConfig`].

use crate::outputs::ExportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Hacker News dashboard.
///
/// # Examples
///
/// ```sh
/// # Interactive dashboard with 50 stories, refreshing every 30 seconds
/// hn_dashboard -n 50 --auto-refresh
///
/// # Headless: fetch once and write a CSV into ./exports
/// hn_dashboard --export csv -o ./exports
///
/// # Settings from a file, logs to a file
/// hn_dashboard -c dashboard.yaml --log-file hn.log
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of stories to fetch (10-100)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Re-run the fetch on a fixed interval
    #[arg(short, long)]
    pub auto_refresh: bool,

    /// Seconds between automatic refreshes
    #[arg(long, value_name = "SECS")]
    pub refresh_interval: Option<u64>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Front page URL
    #[arg(long, env = "HN_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// How long a fetched batch is reused, in seconds
    #[arg(long, value_name = "SECS")]
    pub cache_ttl: Option<u64>,

    /// Directory export files are written to
    #[arg(short = 'o', long)]
    pub export_dir: Option<PathBuf>,

    /// Run without the terminal UI and write each batch in this format
    #[arg(short, long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Write logs to this file (the terminal UI otherwise logs nothing)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_everything_unset() {
        let cli = Cli::parse_from(["hn_dashboard"]);
        assert_eq!(cli.count, None);
        assert!(!cli.auto_refresh);
        assert!(cli.export.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["hn_dashboard", "-n", "50", "-a", "-e", "json", "-o", "/tmp/out"]);

        assert_eq!(cli.count, Some(50));
        assert!(cli.auto_refresh);
        assert_eq!(cli.export, Some(ExportFormat::Json));
        assert_eq!(cli.export_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "hn_dashboard",
            "--count",
            "10",
            "--refresh-interval",
            "45",
            "--timeout",
            "3",
            "--cache-ttl",
            "120",
            "--source-url",
            "http://localhost:8080/",
        ]);

        assert_eq!(cli.count, Some(10));
        assert_eq!(cli.refresh_interval, Some(45));
        assert_eq!(cli.timeout, Some(3));
        assert_eq!(cli.cache_ttl, Some(120));
        assert_eq!(cli.source_url.as_deref(), Some("http://localhost:8080/"));
    }
}
