//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * The layout is a four-row split: a header with the category toggles and
//!   search box, the scrollable list, a details panel for the selected item,
//!   and a one-line status bar.  List rows stay one line tall so the
//!   sentinel maths in [`App::sentinel_ratio`] can count rows.
//! * In the feed view the list ends with [`SENTINEL_ROWS`] extra rows.  How
//!   much of them is on screen drives infinite scrolling, so the list keeps
//!   that many rows of padding below the selection.
//! * Colours come from [`Palette`], picked by the dark-mode preference.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, SENTINEL_ROWS};
use crate::dashboard::View;
use crate::source::{Category, FeedItem};

/// Borders plus headline, link and one line of body text.
const DETAILS_HEIGHT: u16 = 5;

/// Colours for one display mode.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub warn: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Palette {
                bg: Color::Black,
                fg: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                highlight_bg: Color::DarkGray,
                warn: Color::Yellow,
            }
        } else {
            Palette {
                bg: Color::Reset,
                fg: Color::Reset,
                dim: Color::Gray,
                accent: Color::Blue,
                highlight_bg: Color::Gray,
                warn: Color::Red,
            }
        }
    }
}

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let palette = Palette::for_mode(app.dashboard.preferences().dark_mode);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        frame.area(),
    );

    let [header_area, main_area, details_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(DETAILS_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(app, frame, header_area, &palette);
    draw_feed_list(app, frame, main_area, &palette);
    draw_details(app, frame, details_area, &palette);
    draw_status_bar(app, frame, status_area, &palette);
}

/// Category toggles on the left, search box on the right.
fn draw_header(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let [categories_area, search_area] =
        Layout::horizontal([Constraint::Min(40), Constraint::Length(32)]).areas(area);

    let prefs = app.dashboard.preferences();
    let mut spans = Vec::new();
    for (n, category) in Category::ALL.iter().enumerate() {
        let style = if prefs.categories.contains(category) {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.dim)
        };
        spans.push(Span::styled(format!("{} {}", n + 1, category.label()), style));
        spans.push(Span::raw("  "));
    }
    let categories = Paragraph::new(Line::from(spans))
        .block(Block::default().title(" Categories ").borders(Borders::ALL));
    frame.render_widget(categories, categories_area);

    let searching = app.mode == InputMode::Search;
    let mut text = app.search_input.clone();
    if searching {
        text.push('_');
    }
    let search = Paragraph::new(text).block(
        Block::default()
            .title(" Search (/) ")
            .borders(Borders::ALL)
            .border_style(if searching {
                Style::default().fg(palette.accent)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, search_area);
}

/// One list row for a feed item.
fn item_line<'a>(item: &'a FeedItem, favorite: bool, palette: &Palette) -> Line<'a> {
    let marker = if favorite { "♥ " } else { "  " };
    let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Red))];

    match item {
        FeedItem::News(n) => {
            spans.push(Span::styled("NEWS   ", Style::default().fg(palette.accent)));
            spans.push(Span::raw(n.title.as_str()));
            spans.push(Span::styled(
                format!("  [{}]", n.source.name),
                Style::default().fg(palette.dim),
            ));
            if let Some(published) = n.published_at {
                spans.push(Span::styled(
                    format!("  {}", published.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(palette.dim),
                ));
            }
        }
        FeedItem::Movie(m) => {
            spans.push(Span::styled("MOVIE  ", Style::default().fg(Color::Magenta)));
            spans.push(Span::raw(m.title.as_str()));
            spans.push(Span::styled(
                format!("  ★ {:.1}", m.vote_average),
                Style::default().fg(palette.warn),
            ));
            if let Some(year) = m.release_date.get(..4) {
                spans.push(Span::styled(format!("  ({year})"), Style::default().fg(palette.dim)));
            }
        }
        FeedItem::Social(s) => {
            spans.push(Span::styled("SOCIAL ", Style::default().fg(Color::Green)));
            spans.push(Span::styled(
                format!("{}: ", s.author),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(s.content.as_str()));
            spans.push(Span::styled(
                format!("  ♥ {}  💬 {}", s.likes, s.comments),
                Style::default().fg(palette.dim),
            ));
        }
    }
    Line::from(spans)
}

/// Render the scrollable list, or the placeholder when it is empty.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    app.viewport_rows = usize::from(area.height.saturating_sub(2));

    let view = app.dashboard.view();
    let title = match view {
        View::Feed => " Feed ".to_string(),
        View::Favorites => format!(" Favorites ({}) ", app.dashboard.favorites().len()),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let items = app.dashboard.display_items();
    if items.is_empty() {
        let message = if app.dashboard.is_loading() {
            "Loading…"
        } else {
            app.dashboard.empty_message()
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(palette.dim))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let mut rows: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(item_line(item, app.dashboard.is_favorite(item), palette)))
        .collect();

    if view == View::Feed {
        let sentinel = if app.dashboard.is_loading() {
            "Loading…"
        } else if app.dashboard.has_more() {
            ""
        } else {
            "End of feed"
        };
        rows.push(ListItem::new(Line::styled(
            sentinel,
            Style::default().fg(palette.dim),
        )));
        rows.extend((1..SENTINEL_ROWS).map(|_| ListItem::new("")));
    }

    let list = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(palette.highlight_bg),
        )
        .highlight_symbol("▸ ")
        .scroll_padding(SENTINEL_ROWS);

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Headline, link and body of the selected item.
fn draw_details(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = Block::default().title(" Details ").borders(Borders::ALL);
    let Some(item) = app.selected_item() else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![Line::styled(
        item.headline(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(link) = item.link() {
        lines.push(Line::styled(
            format!("o/Enter: read more → {link}"),
            Style::default().fg(palette.accent),
        ));
    }
    lines.push(Line::styled(item.body(), Style::default().fg(palette.dim)));

    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(details, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(palette.warn)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.dashboard.display_items().len()),
            Style::default().fg(Color::Green),
        ),
    ];
    if let Some((label, error)) = app.dashboard.errors().iter().next() {
        let more = app.dashboard.errors().len() - 1;
        let suffix = if more > 0 { format!(" (+{more})") } else { String::new() };
        spans.push(Span::styled(
            format!("  {label}: {error}{suffix}"),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "  q quit  j/k scroll  o open  / search  1-6 categories  f favorite  v favorites  J/K reorder  d theme",
        Style::default().fg(palette.dim),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::fetch::{fetch_page, FetchMsg, DEFAULT_TIMEOUT};
    use crate::merger::{FeedMerger, Interleave};
    use crate::preferences::Preferences;
    use crate::source::Sources;
    use crate::storage::MemoryStore;
    use crate::testing::StubSource;
    use crate::trigger::LoadMoreTrigger;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::sync::Arc;
    use std::time::Duration;

    fn sources() -> Sources {
        Sources {
            news: Arc::new(StubSource::new("news", 1)),
            movies: Arc::new(StubSource::new("movies", 1)),
            social: Arc::new(StubSource::new("social", 1)),
        }
    }

    fn app(prefs: Preferences) -> App {
        let dashboard = Dashboard::new(
            sources(),
            Arc::new(MemoryStore::new()),
            prefs,
            FeedMerger::new(Interleave::RoundRobin, None),
        );
        App::new(dashboard, LoadMoreTrigger::default(), Duration::from_millis(500))
    }

    fn render(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn contains(buffer: &Buffer, needle: &str) -> bool {
        let area = buffer.area;
        (0..area.height).any(|y| {
            let row: String = (0..area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect();
            row.contains(needle)
        })
    }

    #[test]
    fn empty_categories_show_hint() {
        let mut a = app(Preferences {
            categories: vec![],
            ..Preferences::default()
        });
        let buffer = render(&mut a, 120, 20);
        assert!(contains(&buffer, "Please select at least one category"));
    }

    #[test]
    fn loading_placeholder_while_first_page_is_in_flight() {
        let mut a = app(Preferences::default());
        a.dashboard.refresh();
        let buffer = render(&mut a, 120, 20);
        assert!(contains(&buffer, "Loading…"));
    }

    #[tokio::test]
    async fn rows_render_and_viewport_is_recorded() {
        let mut a = app(Preferences::default());
        a.dashboard.refresh();
        let request = a.dashboard.take_request().unwrap();
        let result = fetch_page(&sources(), request, DEFAULT_TIMEOUT).await;
        a.dashboard.apply(FetchMsg::Page(result));
        a.select_first();
        a.toggle_favorite_selected();

        let buffer = render(&mut a, 160, 20);
        // header 3 + details 5 + status 1 + borders 2
        assert_eq!(a.viewport_rows, 9);
        assert!(contains(&buffer, "NEWS"));
        assert!(contains(&buffer, "MOVIE"));
        assert!(contains(&buffer, "SOCIAL"));
        assert!(contains(&buffer, "♥"));
        assert!(contains(&buffer, "4 items"));
        // The sentinel fits, so the next frame would load more.
        assert_eq!(a.sentinel_ratio(), 1.0);
    }

    #[test]
    fn details_panel_shows_body_and_link_of_selection() {
        let mut a = app(Preferences::default());
        let mut story = crate::source::fixtures::news("a");
        if let FeedItem::News(n) = &mut story {
            n.description = "Markets rallied on Friday".to_string();
        }
        a.dashboard.toggle_favorite(&story);
        a.dashboard.toggle_favorite(&crate::source::fixtures::movie(2));
        a.toggle_view();

        let buffer = render(&mut a, 120, 20);
        assert!(contains(&buffer, "Markets rallied on Friday"));
        assert!(contains(&buffer, "read more → https://example.com/a"));

        a.select_next();
        let buffer = render(&mut a, 120, 20);
        assert!(!contains(&buffer, "read more"));
        assert!(contains(&buffer, "Movie 2"));
    }

    #[test]
    fn details_panel_is_empty_without_selection() {
        let mut a = app(Preferences::default());
        a.dashboard.toggle_favorite(&crate::source::fixtures::news("a"));
        let buffer = render(&mut a, 120, 20);
        assert!(contains(&buffer, "Details"));
        assert!(!contains(&buffer, "read more"));
    }

    #[test]
    fn favorites_view_renders_empty_message() {
        let mut a = app(Preferences::default());
        a.toggle_view();
        let buffer = render(&mut a, 120, 20);
        assert!(contains(&buffer, "No favorites yet"));
        assert!(contains(&buffer, "Favorites (0)"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut a = app(Preferences::default());
        render(&mut a, 10, 4);
        render(&mut a, 1, 1);
    }

    #[test]
    fn dark_mode_paints_background() {
        let mut a = app(Preferences {
            dark_mode: true,
            ..Preferences::default()
        });
        let buffer = render(&mut a, 80, 10);
        assert_eq!(buffer[(0, 9)].bg, Color::Black);
    }
}
