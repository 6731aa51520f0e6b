//! Runtime configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults ([`DashboardConfig::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and `HN_SOURCE_URL`
//!
//! ```yaml
//! story_count: 50
//! auto_refresh: true
//! refresh_interval_secs: 30
//! export_dir: ./exports
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::scrapers::{cache, source};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const MIN_STORIES: usize = 10;
pub const MAX_STORIES: usize = 100;
pub const DEFAULT_STORIES: usize = 30;
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub source_url: String,
    pub story_count: usize,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub user_agent: String,
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: source::DEFAULT_SOURCE_URL.to_string(),
            story_count: DEFAULT_STORIES,
            auto_refresh: false,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            request_timeout_secs: source::DEFAULT_TIMEOUT.as_secs(),
            cache_ttl_secs: cache::DEFAULT_TTL.as_secs(),
            user_agent: source::DEFAULT_USER_AGENT.to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl DashboardConfig {
    /// Build the effective configuration from defaults, file and flags.
    ///
    /// # Errors
    ///
    /// The config file cannot be read or parsed, or the merged result fails
    /// [`DashboardConfig::validate`].
    #[instrument(level = "debug", skip_all)]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(count) = cli.count {
            self.story_count = count;
        }
        if cli.auto_refresh {
            self.auto_refresh = true;
        }
        if let Some(secs) = cli.refresh_interval {
            self.refresh_interval_secs = secs;
        }
        if let Some(url) = &cli.source_url {
            self.source_url = url.clone();
        }
        if let Some(secs) = cli.timeout {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = cli.cache_ttl {
            self.cache_ttl_secs = secs;
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_STORIES..=MAX_STORIES).contains(&self.story_count) {
            return Err(ConfigError::StoryCount(self.story_count));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "refresh_interval_secs",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "request_timeout_secs",
            });
        }
        self.source_url()?;
        Ok(())
    }

    pub fn source_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.source_url)?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Zero disables caching: every fetch goes to the network.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Step a story count by `delta`, staying inside the allowed range.
pub fn step_story_count(current: usize, delta: isize) -> usize {
    current
        .saturating_add_signed(delta)
        .clamp(MIN_STORIES, MAX_STORIES)
}
