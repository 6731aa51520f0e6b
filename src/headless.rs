//! Headless mode: fetch, summarize, export, without a terminal UI.
//!
//! Without auto-refresh this runs a single cycle and reports its failure to
//! the caller. With auto-refresh it repeats every interval until Ctrl-C; a
//! failed cycle is logged and the next one runs on schedule.

use crate::analytics;
use crate::config::DashboardConfig;
use crate::outputs::{self, ExportFormat};
use crate::scrapers::{FrontPageScraper, PageSource};
use std::error::Error;
use std::path::PathBuf;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info, instrument};

pub async fn run<S: PageSource>(
    mut scraper: FrontPageScraper<S>,
    config: &DashboardConfig,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    if !config.auto_refresh {
        run_cycle(&mut scraper, config, format).await?;
        return Ok(());
    }

    let period = config.refresh_interval();
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = period.as_secs(), "Auto-refresh enabled; press Ctrl-C to stop");

    loop {
        if let Err(e) = run_cycle(&mut scraper, config, format).await {
            error!(error = %e, "Cycle failed; waiting for the next one");
        }
        tokio::select! {
            _ = timer.tick() => {}
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted; stopping");
                return Ok(());
            }
        }
    }
}

/// One fetch and export. Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(count = config.story_count, ?format))]
pub async fn run_cycle<S: PageSource>(
    scraper: &mut FrontPageScraper<S>,
    config: &DashboardConfig,
    format: ExportFormat,
) -> Result<PathBuf, Box<dyn Error>> {
    let batch = scraper.front_page(config.story_count).await?;

    let summary = analytics::summarize(&batch.stories);
    info!(
        stories = summary.count,
        mean_points = summary.mean_points.round(),
        total_comments = summary.total_comments,
        top_score = summary.max_points.unwrap_or(0),
        captured_at = %batch.captured_at.format("%H:%M:%S"),
        "Batch summary"
    );

    let path = outputs::write_batch(&batch, &config.export_dir, format).await?;
    Ok(path)
}
