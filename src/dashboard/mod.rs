//! Interactive terminal dashboard.
//!
//! The event loop races terminal input against the auto-refresh timer with
//! `tokio::select!`. Every refresh, manual or timed, goes through the
//! [`FrontPageScraper`] cache, so refreshing inside the cache window is free.
//!
//! # Submodules
//!
//! - [`state`]: Interaction model, key handling, derived views
//! - [`render`]: Frame layout and widgets

use crate::config::DashboardConfig;
use crate::outputs::{self, ExportFormat};
use crate::scrapers::{FrontPageScraper, PageSource};
use crate::utils::truncate;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use state::{Action, DashboardState};
use std::error::Error;
use std::io::{self, Stdout};
use std::path::PathBuf;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{error, info, instrument};

pub mod render;
pub mod state;

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

fn initialize_terminal() -> io::Result<DashboardTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut DashboardTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run the dashboard until the user quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run<S: PageSource>(
    scraper: FrontPageScraper<S>,
    config: &DashboardConfig,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = initialize_terminal()?;
    let mut dashboard = Dashboard {
        scraper,
        state: DashboardState::new(config),
        export_dir: config.export_dir.clone(),
    };
    let result = dashboard.event_loop(&mut terminal).await;
    restore_terminal(&mut terminal)?;
    result
}

struct Dashboard<S> {
    scraper: FrontPageScraper<S>,
    state: DashboardState,
    export_dir: PathBuf,
}

impl<S: PageSource> Dashboard<S> {
    async fn event_loop(&mut self, terminal: &mut DashboardTerminal) -> Result<(), Box<dyn Error>> {
        let mut events = EventStream::new();
        let mut timer = self.refresh_timer();
        self.refresh(terminal).await?;

        loop {
            terminal.draw(|frame| render::draw(frame, &self.state))?;

            let action = tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.state.handle_key(key)
                    }
                    Some(Ok(_)) => Action::None,
                    Some(Err(e)) => return Err(e.into()),
                    None => Action::Quit,
                },
                () = next_tick(&mut timer) => {
                    info!("Auto-refresh tick");
                    Action::Refresh
                }
            };

            match action {
                Action::Quit => break,
                Action::Refresh => self.refresh(terminal).await?,
                Action::ForceRefresh => {
                    self.scraper.invalidate();
                    self.refresh(terminal).await?;
                }
                Action::RescheduleRefresh => timer = self.refresh_timer(),
                Action::Export => self.export().await,
                Action::OpenLink(url) => self.open_link(&url),
                Action::None => {}
            }
        }

        info!("Dashboard closed");
        Ok(())
    }

    /// A timer whose first tick is one interval from now, or `None` when
    /// auto-refresh is off.
    fn refresh_timer(&self) -> Option<Interval> {
        self.state.auto_refresh().then(|| {
            let period = self.state.refresh_interval();
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        })
    }

    #[instrument(level = "info", skip_all, fields(count = self.state.story_count()))]
    async fn refresh(&mut self, terminal: &mut DashboardTerminal) -> io::Result<()> {
        self.state.begin_fetch();
        terminal.draw(|frame| render::draw(frame, &self.state))?;

        let result = self.scraper.front_page(self.state.story_count()).await;
        if let Err(e) = &result {
            error!(error = %e, timeout = e.is_timeout(), "Front page fetch failed");
        }
        self.state.apply_fetch(result);
        Ok(())
    }

    async fn export(&mut self) {
        let Some(batch) = self.state.batch() else {
            return;
        };
        let written = outputs::write_batch(batch, &self.export_dir, ExportFormat::Csv).await;
        match written {
            Ok(path) => self
                .state
                .set_status(format!("Exported to {}", path.display())),
            Err(e) => {
                error!(error = %e, dir = %self.export_dir.display(), "Export failed");
                self.state.set_status(format!("Export failed: {e}"));
            }
        }
    }

    fn open_link(&mut self, url: &str) {
        match webbrowser::open(url) {
            Ok(()) => self
                .state
                .set_status(format!("Opened in browser: {}", truncate(url, 80))),
            Err(e) => self.state.set_status(format!("Could not open link: {e}")),
        }
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
