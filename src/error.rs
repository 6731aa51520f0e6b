//! Error types for each failure domain of the dashboard.
//!
//! - [`ScrapeError`]: batch-level failures of a front page fetch. The caller
//!   gets no stories for that cycle and shows the error.
//! - [`ConfigError`]: invalid configuration, fatal at startup.
//! - [`ExportError`]: failures while writing an export file.
//!
//! Record-level failures live next to the parser in
//! [`crate::scrapers::hackernews::EntryError`] because they never leave it.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// A fetch that produced no usable batch.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("source responded with status {0}")]
    Status(StatusCode),
    #[error("no stories found on the page")]
    NoStories,
}

impl ScrapeError {
    /// `true` when the underlying request hit the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Http(e) if e.is_timeout())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("story count {0} is outside the allowed range {min}..={max}", min = crate::config::MIN_STORIES, max = crate::config::MAX_STORIES)]
    StoryCount(usize),
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
