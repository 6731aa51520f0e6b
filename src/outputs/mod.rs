//! Export of a batch to files.
//!
//! # Submodules
//!
//! - [`csv`]: Comma-separated export of the batch, plus reading one back
//! - [`json`]: The batch with its capture timestamp as a JSON document
//!
//! # Output Structure
//!
//! Files land flat in the export directory, named after the capture time:
//!
//! ```text
//! export_dir/
//! ├── hackernews_data_20261017_093005.csv
//! └── hackernews_data_20261017_093005.json
//! ```

use crate::error::ExportError;
use crate::models::Batch;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub mod csv;
pub mod json;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Write `batch` into `dir` in the given format.
///
/// # Returns
///
/// The path of the written file.
pub async fn write_batch(
    batch: &Batch,
    dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    match format {
        ExportFormat::Csv => csv::write_batch(batch, dir).await,
        ExportFormat::Json => json::write_batch(batch, dir).await,
    }
}
