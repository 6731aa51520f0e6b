//! Data models for scraped front page stories.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Story`]: one normalized entry from the front page
//! - [`Batch`]: the ordered stories produced by one fetch, with its capture time
//!
//! A `Story` is created only by the parser in [`crate::scrapers::hackernews`]
//! and is never mutated afterwards. Derived values such as
//! [`Story::engagement`] are computed on demand rather than stored.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Title used when an entry has no title link.
pub const MISSING_TITLE: &str = "N/A";

/// Link used when an entry has no title link.
pub const MISSING_LINK: &str = "#";

/// A single story as it appeared on the front page at fetch time.
///
/// # Fields
///
/// * `rank` - 1-based position on the page
/// * `title` - Title text, or [`MISSING_TITLE`]
/// * `link` - Absolute URL, or [`MISSING_LINK`]
/// * `points` - Score, 0 when the page shows none
/// * `comments` - Comment count, 0 when the page shows none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub rank: usize,
    pub title: String,
    pub link: String,
    pub points: u32,
    pub comments: u32,
}

impl Story {
    /// Ranking score used for display ordering: points plus twice the comments.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let story = Story { points: 100, comments: 50, .. };
    /// assert_eq!(story.engagement(), 200);
    /// ```
    pub fn engagement(&self) -> u64 {
        u64::from(self.points) + 2 * u64::from(self.comments)
    }

    /// Case-insensitive substring match against the title.
    ///
    /// An empty needle matches every story.
    pub fn title_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// The stories produced by one fetch of the front page.
///
/// Each refresh yields a wholly new batch. Stories are ordered by ascending
/// `rank`; ranks are unique but may have gaps where an entry was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// When the page was fetched, in local time.
    pub captured_at: DateTime<Local>,
    pub stories: Vec<Story>,
}

impl Batch {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            captured_at: Local::now(),
            stories,
        }
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
