//! JSON export of a batch, capture timestamp included.

use crate::error::ExportError;
use crate::models::Batch;
use crate::utils::{ensure_writable_dir, export_file_name};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write the batch to `dir/hackernews_data_<capture time>.json`.
///
/// # Output
///
/// ```text
/// {
///   "captured_at": "2026-10-17T09:30:05.123+02:00",
///   "stories": [ { "rank": 1, "title": "...", ... } ]
/// }
/// ```
#[instrument(level = "info", skip(batch), fields(count = batch.len()))]
pub async fn write_batch(batch: &Batch, dir: &Path) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(batch)?;

    ensure_writable_dir(dir).await?;
    let path = dir.join(export_file_name(&batch.captured_at, "json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON export");

    Ok(path)
}
