//! Utility functions for string shortening, export file naming and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging and for fixed-width terminal cells
//! - Timestamped export file names
//! - File system validation for export directories

use chrono::{DateTime, Local};
use std::fs as stdfs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Prefix shared by every export file.
pub const EXPORT_PREFIX: &str = "hackernews_data";

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` bytes (rounded down to a character
/// boundary) and a byte count indicator is appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// File name for an export of a batch captured at `captured_at`.
///
/// # Examples
///
/// ```ignore
/// // hackernews_data_20261017_093005.csv
/// export_file_name(&batch.captured_at, "csv");
/// ```
pub fn export_file_name(captured_at: &DateTime<Local>, extension: &str) -> String {
    format!(
        "{EXPORT_PREFIX}_{}.{extension}",
        captured_at.format("%Y%m%d_%H%M%S")
    )
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path: PathBuf = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Export directory is writable");
    Ok(())
}
