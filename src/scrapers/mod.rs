//! Front page scraping: transport, parsing and memoization.
//!
//! The work is split in three layers so that the site-specific markup can
//! change without touching anything that consumes stories:
//!
//! | Layer | Module | Responsibility |
//! |-------|--------|----------------|
//! | Transport | [`source`] | One HTTP GET with fixed timeout and user agent |
//! | Parsing | [`hackernews`] | Raw markup in, ordered [`Story`](crate::models::Story) records out |
//! | Cache | [`cache`] | Per story count memoization with a TTL |
//!
//! # Failure policy
//!
//! - A failed request, a non-success status or a page without stories fails
//!   the whole batch with a [`ScrapeError`](crate::error::ScrapeError).
//! - A malformed entry is skipped and the batch continues with the rest.
//! - Nothing is retried.

pub mod cache;
pub mod hackernews;
pub mod source;

pub use cache::FrontPageScraper;
pub use source::{HttpSource, PageSource};
