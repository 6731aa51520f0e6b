//! CSV export.
//!
//! The file has a header row and one row per story, in rank order:
//!
//! ```text
//! rank,title,link,points,comments,engagement
//! 1,"Rust, again",https://example.com/,120,40,200
//! ```
//!
//! `engagement` is derived and ignored when a file is read back.

use crate::error::ExportError;
use crate::models::{Batch, Story};
use crate::utils::{ensure_writable_dir, export_file_name};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Serialize)]
struct ExportRow<'a> {
    rank: usize,
    title: &'a str,
    link: &'a str,
    points: u32,
    comments: u32,
    engagement: u64,
}

impl<'a> From<&'a Story> for ExportRow<'a> {
    fn from(story: &'a Story) -> Self {
        Self {
            rank: story.rank,
            title: &story.title,
            link: &story.link,
            points: story.points,
            comments: story.comments,
            engagement: story.engagement(),
        }
    }
}

/// Serialize stories as CSV into any writer.
pub fn write_stories<W: Write>(writer: W, stories: &[Story]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for story in stories {
        csv_writer.serialize(ExportRow::from(story))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read stories back from an export, ignoring derived columns.
#[cfg(test)]
pub fn read_stories<R: std::io::Read>(reader: R) -> Result<Vec<Story>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let stories = csv_reader
        .deserialize::<Story>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stories)
}

pub fn to_csv_bytes(stories: &[Story]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_stories(&mut buf, stories)?;
    Ok(buf)
}

/// Write the batch to `dir/hackernews_data_<capture time>.csv`.
#[instrument(level = "info", skip(batch), fields(count = batch.len()))]
pub async fn write_batch(batch: &Batch, dir: &Path) -> Result<PathBuf, ExportError> {
    ensure_writable_dir(dir).await?;
    let path = dir.join(export_file_name(&batch.captured_at, "csv"));
    fs::write(&path, to_csv_bytes(&batch.stories)?).await?;
    info!(path = %path.display(), "Wrote CSV export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stories() -> Vec<Story> {
        vec![
            Story {
                rank: 1,
                title: "Show HN: \"quotes\", commas, and more".to_string(),
                link: "https://example.com/a?x=1,2".to_string(),
                points: 100,
                comments: 50,
            },
            Story {
                rank: 3,
                title: "N/A".to_string(),
                link: "#".to_string(),
                points: 0,
                comments: 0,
            },
        ]
    }

    #[test]
    fn test_header_and_engagement_column() {
        let text = String::from_utf8(to_csv_bytes(&stories()).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("rank,title,link,points,comments,engagement")
        );
        assert!(lines.next().unwrap().ends_with(",100,50,200"));
    }

    #[test]
    fn test_export_reads_back_in_order() {
        let original = stories();
        let bytes = to_csv_bytes(&original).unwrap();
        assert_eq!(read_stories(bytes.as_slice()).unwrap(), original);
    }

    #[tokio::test]
    async fn test_write_batch_names_file_after_capture_time() {
        let mut dir = std::env::temp_dir();
        dir.push("hn_dashboard_csv_export");
        let _ = std::fs::remove_dir_all(&dir);

        let batch = Batch::new(stories());
        let path = write_batch(&batch, &dir).await.unwrap();

        let expected = export_file_name(&batch.captured_at, "csv");
        assert_eq!(path.file_name().unwrap().to_string_lossy(), expected);
        let file = std::fs::File::open(&path).unwrap();
        assert_eq!(read_stories(file).unwrap(), batch.stories);
    }
}
