//! Aggregates and derived views over a batch of stories.
//!
//! Everything here borrows the batch and returns new views; nothing mutates
//! the stories, so a filter applied for display never changes the metrics.

use crate::models::Story;
use itertools::Itertools;

/// Headline metrics for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_points: f64,
    pub total_comments: u64,
    /// `None` for an empty batch.
    pub max_points: Option<u32>,
}

/// One bar of the points histogram, covering `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub start: u32,
    pub end: u32,
    pub count: usize,
}

impl Bucket {
    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }
}

pub fn summarize(stories: &[Story]) -> Summary {
    let count = stories.len();
    let total_points: u64 = stories.iter().map(|s| u64::from(s.points)).sum();
    let mean_points = if count == 0 {
        0.0
    } else {
        total_points as f64 / count as f64
    };

    Summary {
        count,
        mean_points,
        total_comments: stories.iter().map(|s| u64::from(s.comments)).sum(),
        max_points: stories.iter().map(|s| s.points).max(),
    }
}

/// Stories whose title contains `needle`, ignoring case, in batch order.
pub fn filter_by_title<'a>(stories: &'a [Story], needle: &str) -> Vec<&'a Story> {
    stories.iter().filter(|s| s.title_contains(needle)).collect()
}

/// The `n` stories with the highest engagement. Ties keep batch order.
pub fn top_by_engagement(stories: &[Story], n: usize) -> Vec<&Story> {
    stories
        .iter()
        .sorted_by(|a, b| b.engagement().cmp(&a.engagement()))
        .take(n)
        .collect()
}

/// The `n` stories with the most points. Ties keep batch order.
pub fn top_by_points(stories: &[Story], n: usize) -> Vec<&Story> {
    stories
        .iter()
        .sorted_by(|a, b| b.points.cmp(&a.points))
        .take(n)
        .collect()
}

/// Equal-width histogram of points between the batch minimum and maximum.
///
/// Produces at most `bins` buckets; fewer when the range is narrower than
/// `bins` points. Empty input yields no buckets.
pub fn points_histogram(stories: &[Story], bins: usize) -> Vec<Bucket> {
    let Some((min, max)) = stories.iter().map(|s| s.points).minmax().into_option() else {
        return Vec::new();
    };
    let bins = bins.max(1) as u64;
    let span = u64::from(max - min) + 1;
    let width = span.div_ceil(bins);

    let mut buckets: Vec<Bucket> = (0..span.div_ceil(width))
        .map(|i| {
            let start = u64::from(min) + i * width;
            let end = (start + width - 1).min(u64::from(max));
            Bucket {
                start: start as u32,
                end: end as u32,
                count: 0,
            }
        })
        .collect();

    for story in stories {
        let index = (u64::from(story.points - min) / width) as usize;
        buckets[index].count += 1;
    }
    buckets
}
