//! Drawing of the dashboard frame.
//!
//! ```text
//! ┌ Hacker News Dashboard | last updated 09:30:05 | 30 stories | auto-refresh off ┐
//! │ Total Stories │ Avg Points │ Total Comments │ Top Score                       │
//! │ Stories  Analytics  Top Stories                                               │
//! │ <tab body>                                                                    │
//! │ <status line>                                                                 │
//! ```

use super::state::{DashboardState, TOP_N, Tab, View};
use crate::analytics::{self, Summary};
use crate::models::{Batch, Story};
use crate::utils::truncate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, List, ListItem,
        ListState, Paragraph, Tabs, Wrap,
    },
};

const ACCENT: Color = Color::Rgb(255, 102, 0);
const HISTOGRAM_BINS: usize = 20;

pub fn draw(frame: &mut Frame, state: &DashboardState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, layout[0], state);
    draw_metrics(frame, layout[1], state.summary().as_ref());

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| Line::from(t.title())))
        .select(state.tab().index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .divider(Span::raw(" "));
    frame.render_widget(tabs, layout[2]);

    match state.view() {
        View::Loading => {
            let loading = Paragraph::new("Fetching stories...").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, layout[3]);
        }
        View::Failed(cause) => draw_failure(frame, layout[3], cause),
        View::Loaded(batch) => match state.tab() {
            Tab::Stories => draw_stories(frame, layout[3], state),
            Tab::Analytics => draw_analytics(frame, layout[3], batch),
            Tab::TopStories => draw_top_stories(frame, layout[3], state),
        },
    }

    let status = Paragraph::new(state.status().to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, layout[4]);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let updated = state
        .batch()
        .map(|b| b.captured_at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let refresh = if state.auto_refresh() {
        format!("auto-refresh {}s", state.refresh_interval().as_secs())
    } else {
        "auto-refresh off".to_string()
    };

    let header = Line::from(vec![
        Span::styled(
            "Hacker News Dashboard",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  | last updated {updated} | {} stories | {refresh}",
                state.story_count()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_metrics(frame: &mut Frame, area: Rect, summary: Option<&Summary>) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = match summary {
        Some(s) => [
            s.count.to_string(),
            format!("{:.0}", s.mean_points),
            s.total_comments.to_string(),
            s.max_points.map_or_else(|| "-".to_string(), |p| p.to_string()),
        ],
        None => std::array::from_fn(|_| "-".to_string()),
    };
    let titles = ["Total Stories", "Avg Points", "Total Comments", "Top Score"];

    for ((cell, title), value) in cells.iter().zip(titles).zip(values) {
        let metric = Paragraph::new(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(metric, *cell);
    }
}

fn draw_failure(frame: &mut Frame, area: Rect, cause: &str) {
    let text = vec![
        Line::from(Span::styled(
            "Failed to fetch data. Please try again.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(cause.to_string(), Style::default().fg(Color::Red))),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    frame.render_widget(paragraph, area);
}

fn story_counts(story: &Story) -> Span<'static> {
    Span::styled(
        format!("{} points | {} comments", story.points, story.comments),
        Style::default().fg(Color::DarkGray),
    )
}

fn draw_stories(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let cursor = if state.is_editing_search() { "_" } else { "" };
    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}{cursor}", state.search())),
    ]));
    frame.render_widget(search, layout[0]);

    let stories = state.current_list();
    let width = layout[1].width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = if stories.is_empty() {
        vec![ListItem::new(" No stories match the search.")]
    } else {
        stories
            .iter()
            .map(|story| {
                ListItem::new(vec![
                    Line::from(format!(" {:>3}. {}", story.rank, truncate(&story.title, width))),
                    Line::from(vec![Span::raw("      "), story_counts(story)]),
                ])
            })
            .collect()
    };

    render_list(frame, layout[1], items, state.selected_index(), "Latest Stories");
}

fn draw_top_stories(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let width = area.width.saturating_sub(10) as usize;
    let items: Vec<ListItem> = state
        .current_list()
        .iter()
        .map(|story| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!(" #{} - {}", story.rank, truncate(&story.title, width)),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![Span::raw("   "), story_counts(story)]),
                Line::from(Span::styled(
                    format!("   {}", truncate(&story.link, width)),
                    Style::default().fg(Color::Blue),
                )),
            ])
        })
        .collect();

    render_list(frame, area, items, state.selected_index(), "Trending Stories");
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected: Option<usize>,
    title: &str,
) {
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_analytics(frame: &mut Frame, area: Rect, batch: &Batch) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    draw_points_histogram(frame, top[0], &batch.stories);
    draw_scatter(frame, top[1], &batch.stories);
    draw_engagement(frame, rows[1], &batch.stories);
}

fn draw_points_histogram(frame: &mut Frame, area: Rect, stories: &[Story]) {
    let buckets = analytics::points_histogram(stories, HISTOGRAM_BINS);
    let bars: Vec<Bar> = buckets
        .iter()
        .map(|bucket| {
            Bar::default()
                .value(bucket.count as u64)
                .label(Line::from(bucket.label()))
        })
        .collect();
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / buckets.len().max(1) as u16).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Points Distribution"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(ACCENT));
    frame.render_widget(chart, area);
}

fn draw_scatter(frame: &mut Frame, area: Rect, stories: &[Story]) {
    let points: Vec<(f64, f64)> = stories
        .iter()
        .map(|s| (f64::from(s.points), f64::from(s.comments)))
        .collect();
    let max_x = points.iter().map(|p| p.0).fold(1.0, f64::max);
    let max_y = points.iter().map(|p| p.1).fold(1.0, f64::max);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title("Comments vs Points"))
        .x_axis(
            Axis::default()
                .title("Points")
                .bounds([0.0, max_x])
                .labels(["0".to_string(), format!("{max_x:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("Comments")
                .bounds([0.0, max_y])
                .labels(["0".to_string(), format!("{max_y:.0}")]),
        );
    frame.render_widget(chart, area);
}

fn draw_engagement(frame: &mut Frame, area: Rect, stories: &[Story]) {
    let label_width = (area.width / 2) as usize;
    let bars: Vec<Bar> = analytics::top_by_engagement(stories, TOP_N)
        .into_iter()
        .map(|story| {
            Bar::default()
                .value(story.engagement())
                .label(Line::from(truncate(&story.title, label_width)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Top {TOP_N} Stories by Engagement (Points + Comments x2)")),
        )
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::Blue));
    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::error::ScrapeError;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new(&DashboardConfig::default());
        state.apply_fetch(Ok(Batch::new(vec![
            Story {
                rank: 1,
                title: "Quake Brutalist Jam II".to_string(),
                link: "https://slipseer.com/".to_string(),
                points: 283,
                comments: 87,
            },
            Story {
                rank: 2,
                title: "Koch Snowflake".to_string(),
                link: "https://tikalon.com/".to_string(),
                points: 11,
                comments: 1,
            },
        ])));
        state
    }

    #[test]
    fn test_stories_tab_shows_metrics_and_rows() {
        let screen = render(&loaded_state());
        assert!(screen.contains("Total Stories"));
        assert!(screen.contains("147"));
        assert!(screen.contains("Quake Brutalist Jam II"));
        assert!(screen.contains("283 points | 87 comments"));
    }

    #[test]
    fn test_failure_shows_error() {
        let mut state = DashboardState::new(&DashboardConfig::default());
        state.apply_fetch(Err(ScrapeError::NoStories));
        let screen = render(&state);
        assert!(screen.contains("Failed to fetch data"));
        assert!(screen.contains("no stories found on the page"));
    }

    #[test]
    fn test_every_tab_renders() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        let mut state = loaded_state();
        for _ in Tab::ALL {
            render(&state);
            state.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
        state.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        assert!(render(&state).contains("Points Distribution"));
    }
}
