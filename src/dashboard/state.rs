//! Dashboard state and key handling.
//!
//! [`DashboardState`] owns everything the renderer reads and turns key presses
//! into [`Action`]s for the event loop. It does no I/O, so the whole
//! interaction model is testable without a terminal.

use crate::analytics::{self, Summary};
use crate::config::{DashboardConfig, step_story_count};
use crate::error::ScrapeError;
use crate::models::{Batch, Story};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// How many stories the ranked views show.
pub const TOP_N: usize = 10;

/// Step applied by `+` / `-` to the story count.
const COUNT_STEP: isize = 10;

pub const LIST_HELP: &str = "↑/k ↓/j move • tab switch • / search • o open • r/R refresh • a auto-refresh • +/- count • e export • q quit";
pub const SEARCH_HELP: &str = "type to filter • enter keep • esc clear";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Stories,
    Analytics,
    TopStories,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Stories, Tab::Analytics, Tab::TopStories];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Stories => "Stories",
            Tab::Analytics => "Analytics",
            Tab::TopStories => "Top Stories",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    /// Refresh bypassing the cache.
    ForceRefresh,
    RescheduleRefresh,
    Export,
    OpenLink(String),
}

/// Result of the most recent fetch cycle.
#[derive(Debug)]
pub enum View {
    Loading,
    Loaded(Batch),
    Failed(String),
}

#[derive(Debug)]
pub struct DashboardState {
    story_count: usize,
    auto_refresh: bool,
    refresh_interval: Duration,
    view: View,
    tab: Tab,
    search: String,
    editing_search: bool,
    selected: usize,
    status: String,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            story_count: config.story_count,
            auto_refresh: config.auto_refresh,
            refresh_interval: config.refresh_interval(),
            view: View::Loading,
            tab: Tab::Stories,
            search: String::new(),
            editing_search: false,
            selected: 0,
            status: LIST_HELP.to_string(),
        }
    }

    pub fn story_count(&self) -> usize {
        self.story_count
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_editing_search(&self) -> bool {
        self.editing_search
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn batch(&self) -> Option<&Batch> {
        match &self.view {
            View::Loaded(batch) => Some(batch),
            _ => None,
        }
    }

    /// Metrics over the whole batch; the search filter never applies here.
    pub fn summary(&self) -> Option<Summary> {
        self.batch().map(|batch| analytics::summarize(&batch.stories))
    }

    pub fn begin_fetch(&mut self) {
        self.view = View::Loading;
        self.status = format!("Fetching {} stories...", self.story_count);
    }

    /// Install the outcome of a fetch. A failure replaces any previous batch.
    pub fn apply_fetch(&mut self, result: Result<Batch, ScrapeError>) {
        match result {
            Ok(batch) => {
                self.status = format!(
                    "Loaded {} stories at {}",
                    batch.len(),
                    batch.captured_at.format("%H:%M:%S")
                );
                self.view = View::Loaded(batch);
                self.clamp_selection();
            }
            Err(e) => {
                self.status = "Failed to fetch data. Press r to try again.".to_string();
                self.view = View::Failed(e.to_string());
                self.selected = 0;
            }
        }
    }

    /// The selectable list for the active tab, in display order.
    pub fn current_list(&self) -> Vec<&Story> {
        let Some(batch) = self.batch() else {
            return Vec::new();
        };
        match self.tab {
            Tab::Stories => analytics::filter_by_title(&batch.stories, &self.search),
            Tab::TopStories => analytics::top_by_points(&batch.stories, TOP_N),
            Tab::Analytics => Vec::new(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        let len = self.current_list().len();
        (len > 0).then(|| self.selected.min(len - 1))
    }

    pub fn selected_story(&self) -> Option<&Story> {
        let index = self.selected_index()?;
        self.current_list().get(index).copied()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected_index().unwrap_or(0);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.editing_search {
            self.handle_search_key(key);
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.switch_tab(self.tab.next());
                Action::None
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.switch_tab(self.tab.previous());
                Action::None
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = self.selected.saturating_add(1);
                self.clamp_selection();
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.current_list().len().saturating_sub(1);
                Action::None
            }
            KeyCode::Char('/') => {
                self.switch_tab(Tab::Stories);
                self.editing_search = true;
                self.status = SEARCH_HELP.to_string();
                Action::None
            }
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('R') => Action::ForceRefresh,
            KeyCode::Char('a') => {
                self.auto_refresh = !self.auto_refresh;
                self.status = if self.auto_refresh {
                    format!("Auto-refresh every {}s", self.refresh_interval.as_secs())
                } else {
                    "Auto-refresh off".to_string()
                };
                Action::RescheduleRefresh
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_count(COUNT_STEP),
            KeyCode::Char('-') => self.change_count(-COUNT_STEP),
            KeyCode::Char('e') => {
                if self.batch().is_some() {
                    Action::Export
                } else {
                    self.status = "Nothing to export yet".to_string();
                    Action::None
                }
            }
            KeyCode::Char('o') | KeyCode::Enter => match self.selected_story() {
                Some(story) => Action::OpenLink(story.link.clone()),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.search.push(c),
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Enter => {
                self.editing_search = false;
                self.status = LIST_HELP.to_string();
            }
            KeyCode::Esc => {
                self.search.clear();
                self.editing_search = false;
                self.status = LIST_HELP.to_string();
            }
            _ => {}
        }
        self.selected = 0;
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected = 0;
        }
    }

    fn change_count(&mut self, delta: isize) -> Action {
        let next = step_story_count(self.story_count, delta);
        if next == self.story_count {
            return Action::None;
        }
        self.story_count = next;
        Action::Refresh
    }
}
