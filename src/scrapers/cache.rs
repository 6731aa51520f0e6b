//! Time-boxed memoization of front page fetches.
//!
//! [`FrontPageScraper`] combines a [`PageSource`] with the parser and keeps the
//! last successful batch for each requested story count. A repeat request for
//! the same count inside the TTL is served from memory; after the TTL the next
//! request goes back to the source. Failures are never cached.

use super::hackernews::parse_front_page;
use super::source::PageSource;
use crate::error::ScrapeError;
use crate::models::Batch;
use crate::utils::truncate_for_log;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CacheEntry {
    stored_at: Instant,
    batch: Batch,
}

/// Fetches, parses and memoizes front page batches keyed by story count.
#[derive(Debug)]
pub struct FrontPageScraper<S> {
    source: S,
    ttl: Duration,
    entries: HashMap<usize, CacheEntry>,
}

impl<S: PageSource> FrontPageScraper<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Return up to `limit` stories from the front page.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of stories; also the cache key
    ///
    /// # Returns
    ///
    /// A non-empty [`Batch`], either fresh or cached.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::NoStories`] if the page parsed to nothing, or whatever
    /// the source reported. Nothing is retried.
    #[instrument(level = "info", skip(self))]
    pub async fn front_page(&mut self, limit: usize) -> Result<Batch, ScrapeError> {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);

        if let Some(entry) = self.entries.get(&limit) {
            debug!(age = ?now.duration_since(entry.stored_at), "Serving cached batch");
            return Ok(entry.batch.clone());
        }

        let html = self.source.fetch_page().await?;
        let batch = Batch::new(parse_front_page(&html, limit, self.source.url()));
        if batch.is_empty() {
            warn!(
                bytes = html.len(),
                preview = %truncate_for_log(&html, 200),
                "Front page contained no parsable stories"
            );
            return Err(ScrapeError::NoStories);
        }

        info!(count = batch.len(), "Fetched fresh batch");
        self.entries.insert(
            limit,
            CacheEntry {
                stored_at: Instant::now(),
                batch: batch.clone(),
            },
        );
        Ok(batch)
    }

    /// Drop every cached batch so the next call hits the source.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::hackernews::tests::numbered_page;
    use reqwest::StatusCode;
    use std::cell::Cell;
    use url::Url;

    struct CountingSource {
        url: Url,
        body: String,
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingSource {
        fn new(body: String) -> Self {
            Self {
                url: Url::parse("https://news.ycombinator.com/").unwrap(),
                body,
                calls: Cell::new(0),
                fail: false,
            }
        }
    }

    impl PageSource for CountingSource {
        fn url(&self) -> &Url {
            &self.url
        }

        async fn fetch_page(&self) -> Result<String, ScrapeError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(ScrapeError::Status(StatusCode::BAD_GATEWAY))
            } else {
                Ok(self.body.clone())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_limit_within_ttl_hits_source_once() {
        let mut scraper = FrontPageScraper::new(CountingSource::new(numbered_page(30)), DEFAULT_TTL);

        let first = scraper.front_page(30).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = scraper.front_page(30).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(scraper.source.calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let mut scraper = FrontPageScraper::new(CountingSource::new(numbered_page(30)), DEFAULT_TTL);

        scraper.front_page(30).await.unwrap();
        tokio::time::advance(DEFAULT_TTL + Duration::from_secs(1)).await;
        scraper.front_page(30).await.unwrap();

        assert_eq!(scraper.source.calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_is_keyed_by_limit() {
        let mut scraper = FrontPageScraper::new(CountingSource::new(numbered_page(30)), DEFAULT_TTL);

        let ten = scraper.front_page(10).await.unwrap();
        let twenty = scraper.front_page(20).await.unwrap();
        scraper.front_page(10).await.unwrap();

        assert_eq!(ten.len(), 10);
        assert_eq!(twenty.len(), 20);
        assert_eq!(scraper.source.calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let mut source = CountingSource::new(String::new());
        source.fail = true;
        let mut scraper = FrontPageScraper::new(source, DEFAULT_TTL);

        assert!(scraper.front_page(30).await.is_err());
        assert!(scraper.front_page(30).await.is_err());
        assert_eq!(scraper.source.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_empty_page_is_an_error() {
        let source = CountingSource::new("<html><body>maintenance</body></html>".to_string());
        let mut scraper = FrontPageScraper::new(source, DEFAULT_TTL);
        assert!(matches!(
            scraper.front_page(30).await,
            Err(ScrapeError::NoStories)
        ));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let mut scraper = FrontPageScraper::new(CountingSource::new(numbered_page(12)), DEFAULT_TTL);
        scraper.front_page(10).await.unwrap();
        scraper.invalidate();
        scraper.front_page(10).await.unwrap();
        assert_eq!(scraper.source.calls.get(), 2);
    }
}
