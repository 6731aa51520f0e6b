//! Transport for the front page markup.
//!
//! [`PageSource`] is the seam between the network and everything above it:
//! the cache and the dashboard only ever ask a source for "the page", so they
//! can be exercised without a network in tests.

use crate::error::ScrapeError;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Default front page location.
pub const DEFAULT_SOURCE_URL: &str = "https://news.ycombinator.com/";

/// Browser-like identification; the site serves a reduced page to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce the raw front page markup.
pub trait PageSource {
    /// The URL the page is fetched from; relative links resolve against it.
    fn url(&self) -> &Url;

    /// Fetch the page body.
    ///
    /// # Errors
    ///
    /// Any transport failure, timeout, or non-success status.
    async fn fetch_page(&self) -> Result<String, ScrapeError>;
}

/// [`PageSource`] backed by a single HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    /// Build a source with a fixed timeout and user agent.
    ///
    /// # Arguments
    ///
    /// * `url` - Front page URL
    /// * `timeout` - Whole-request timeout, connect through body
    /// * `user_agent` - Value of the `User-Agent` header
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url })
    }
}

impl PageSource for HttpSource {
    fn url(&self) -> &Url {
        &self.url
    }

    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch_page(&self) -> Result<String, ScrapeError> {
        let response = self.client.get(self.url.clone()).send().await.map_err(|e| {
            warn!(error = %e, timeout = e.is_timeout(), "Front page request failed");
            ScrapeError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Front page returned non-success status");
            return Err(ScrapeError::Status(status));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched front page");
        Ok(body)
    }
}
