//! # HN Dashboard
//!
//! A terminal dashboard for the Hacker News front page. It scrapes the page,
//! normalizes each entry into a story record and shows the batch as metrics,
//! lists and charts, with a title filter and CSV export.
//!
//! ## Features
//!
//! - Scrapes up to 100 front page stories in one request (title, link,
//!   points, comment count)
//! - Reuses a fetched batch for a minute per story count
//! - Stories, Analytics and Top Stories tabs; engagement ranking
//!   (points + 2 × comments)
//! - CSV and JSON export named after the capture time
//! - Optional auto-refresh on a fixed, cancellable interval
//! - Headless mode for cron jobs and scripts
//!
//! ## Usage
//!
//! ```sh
//! hn_dashboard -n 50 --auto-refresh
//! hn_dashboard --export csv -o ./exports
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: defaults, optional YAML file, then CLI flags
//! 2. **Fetching**: one GET per cache miss ([`scrapers::source`])
//! 3. **Parsing**: markup to story records ([`scrapers::hackernews`])
//! 4. **Presentation**: terminal UI ([`dashboard`]) or export-only ([`headless`])

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analytics;
mod cli;
mod config;
mod dashboard;
mod error;
mod headless;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::DashboardConfig;
use scrapers::{FrontPageScraper, HttpSource};

/// Install the global subscriber.
///
/// Logs go to `--log-file` when given, otherwise to stderr in headless mode.
/// The terminal UI owns the screen, so without a log file it logs nothing.
fn init_tracing(args: &Cli) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    match (&args.log_file, args.export) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, Some(_)) => builder.with_writer(std::io::stderr).init(),
        (None, None) => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(&args)?;

    let start_time = std::time::Instant::now();
    info!("hn_dashboard starting up");
    debug!(?args, "Parsed CLI arguments");

    let config = DashboardConfig::resolve(&args)?;
    info!(
        source_url = %config.source_url,
        story_count = config.story_count,
        auto_refresh = config.auto_refresh,
        "Loaded configuration"
    );

    let source = HttpSource::new(
        config.source_url()?,
        config.request_timeout(),
        &config.user_agent,
    )?;
    let scraper = FrontPageScraper::new(source, config.cache_ttl());

    match args.export {
        Some(format) => headless::run(scraper, &config, format).await?,
        None => dashboard::run(scraper, &config).await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}
