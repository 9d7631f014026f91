//! Terminal view state wrapped around the [`Dashboard`].
//!
//! `App` owns what only the terminal cares about: list selection, the search
//! box, the status line and the geometry needed to compute how much of the
//! load-more sentinel is on screen.

use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::dashboard::{Dashboard, View};
use crate::fetch::FetchMsg;
use crate::link::validate_url_for_open;
use crate::source::{Category, FeedItem};
use crate::trigger::{intersection_ratio, LoadMoreTrigger};

/// Rows rendered after the last feed item.  Their visible fraction is the
/// load-more intersection ratio.
pub const SENTINEL_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub dashboard: Dashboard,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    pub mode: InputMode,
    /// Text in the search box; committed to the dashboard after `debounce`.
    pub search_input: String,
    search_edited_at: Option<Instant>,
    debounce: Duration,
    trigger: LoadMoreTrigger,
    /// Inner height of the list as last drawn.
    pub viewport_rows: usize,
}

impl App {
    pub fn new(dashboard: Dashboard, trigger: LoadMoreTrigger, debounce: Duration) -> Self {
        let search_input = dashboard.preferences().search_query.clone();
        Self {
            dashboard,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            mode: InputMode::Normal,
            search_input,
            search_edited_at: None,
            debounce,
            trigger,
            viewport_rows: 0,
        }
    }

    fn len(&self) -> usize {
        self.dashboard.display_items().len()
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.len() > 0 {
            self.list_state.select(Some(self.len() - 1));
        }
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.list_state
            .selected()
            .and_then(|i| self.dashboard.display_items().get(i))
    }

    /// Open the selected item's link in the system browser.
    pub fn open_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let Some(link) = item.link() else {
            self.status = "No link for this item".to_string();
            return;
        };
        self.status = match validate_url_for_open(link) {
            Err(e) => e.to_string(),
            Ok(url) => match open::that(url.as_str()) {
                Ok(()) => format!("Opening {}", url.host_str().unwrap_or("link")),
                Err(e) => format!("Failed to open browser: {e}"),
            },
        };
    }

    /// Keep the selection inside the list after it shrank or was replaced.
    pub fn clamp_selection(&mut self) {
        match (self.list_state.selected(), self.len()) {
            (_, 0) => self.list_state.select(None),
            (Some(i), len) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // -- load more -----------------------------------------------------------

    /// Visible fraction of the sentinel rows, from the last drawn frame.
    pub fn sentinel_ratio(&self) -> f32 {
        if self.dashboard.view() != View::Feed {
            return 0.0;
        }
        intersection_ratio(
            self.list_state.offset(),
            self.viewport_rows,
            self.len(),
            SENTINEL_ROWS,
        )
    }

    /// Ask the dashboard for the next page if the sentinel is in view.
    pub fn check_load_more(&mut self) -> bool {
        let fire = self.trigger.should_fire(
            self.sentinel_ratio(),
            self.dashboard.is_loading(),
            self.dashboard.has_more(),
        );
        fire && self.dashboard.load_more()
    }

    /// Hand a finished page to the dashboard; select the first row of a
    /// fresh feed.
    pub fn apply_page(&mut self, msg: FetchMsg) {
        if self.dashboard.apply(msg) {
            self.status = format!("{} items", self.dashboard.feed().len());
            if self.list_state.selected().is_none() {
                self.select_first();
            }
        }
    }

    // -- search --------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.search_edited_at = Some(Instant::now());
    }

    pub fn search_pop(&mut self) {
        self.search_input.pop();
        self.search_edited_at = Some(Instant::now());
    }

    /// Commit the search box now and leave search mode.
    pub fn submit_search(&mut self) {
        self.commit_search();
        self.mode = InputMode::Normal;
    }

    /// Leave search mode; pending text is still committed by the debounce.
    pub fn leave_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    fn commit_search(&mut self) {
        self.search_edited_at = None;
        self.dashboard.set_search_query(&self.search_input);
        self.list_state.select(None);
        self.status = match self.dashboard.preferences().search_query.trim() {
            "" => "Search cleared".to_string(),
            q => format!("Searching for \"{q}\""),
        };
    }

    /// Periodic housekeeping: commits the search box once typing has paused.
    pub fn tick(&mut self, now: Instant) {
        if let Some(edited) = self.search_edited_at {
            if now.duration_since(edited) >= self.debounce {
                self.commit_search();
            }
        }
    }

    // -- actions -------------------------------------------------------------

    /// Toggle the `n`th category (0-based, stable order).
    pub fn toggle_category(&mut self, n: usize) {
        let Some(category) = Category::ALL.get(n).copied() else {
            return;
        };
        self.dashboard.toggle_category(category);
        self.list_state.select(None);
        let state = if self.dashboard.preferences().categories.contains(&category) {
            "on"
        } else {
            "off"
        };
        self.status = format!("{} {state}", category.label());
    }

    pub fn toggle_favorite_selected(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            return;
        };
        let now_favorite = self.dashboard.toggle_favorite(&item);
        self.status = if now_favorite {
            format!("Added \"{}\" to favorites", item.headline())
        } else {
            format!("Removed \"{}\" from favorites", item.headline())
        };
        self.clamp_selection();
    }

    /// Move the selected favorite one slot up (`-1`) or down (`+1`).
    pub fn move_selected_favorite(&mut self, delta: isize) {
        if self.dashboard.view() != View::Favorites {
            return;
        }
        let Some(from) = self.list_state.selected() else {
            return;
        };
        let Some(to) = from.checked_add_signed(delta).filter(|to| *to < self.len()) else {
            return;
        };
        self.dashboard.move_favorite(from, to);
        self.list_state.select(Some(to));
    }

    pub fn toggle_view(&mut self) {
        self.dashboard.toggle_view();
        self.list_state = ListState::default();
        self.select_first();
        self.status = match self.dashboard.view() {
            View::Feed => "Feed".to_string(),
            View::Favorites => format!("Favorites ({})", self.dashboard.favorites().len()),
        };
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dashboard.toggle_dark_mode();
    }
}
