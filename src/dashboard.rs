//! The dashboard: preferences, pagination, merged feed and favorites, kept
//! consistent with one another.
//!
//! The dashboard never performs I/O against sources itself.  Operations that
//! need a page queue a [`PageRequest`] which the event loop collects with
//! [`Dashboard::take_request`] and hands to [`crate::fetch::spawn_page`]; the
//! result comes back through [`Dashboard::apply`].
//!
//! ## Request lifecycle
//!
//! * Any filter or query change resets every cursor (bumping the pagination
//!   generation), clears the merged feed and queues page 1.
//! * [`load_more`](Dashboard::load_more) advances every cursor and queues the
//!   next page, but only when nothing is in flight and more data exists.
//! * A result whose generation is not the one in flight is dropped: it
//!   answers a query the user has since replaced.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::favorites::FavoritesStore;
use crate::fetch::{plan_page, FetchMsg, PageRequest};
use crate::merger::FeedMerger;
use crate::pagination::{Cursors, Pagination};
use crate::preferences::{Preferences, PreferencesStore};
use crate::source::{Category, FeedItem, ItemKey, Sources};
use crate::storage::{KeyValueStore, PREFERENCES_KEY};

/// Which list is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Favorites,
}

pub struct Dashboard {
    sources: Sources,
    storage: Arc<dyn KeyValueStore>,
    prefs: PreferencesStore,
    favorites: FavoritesStore,
    pagination: Pagination,
    merger: FeedMerger,
    /// Generation of the request currently being fetched.
    in_flight: Option<u64>,
    /// No fetch of the last page reported more data.
    exhausted: bool,
    /// Last failure per fetch label (`news/technology`, `movies`, ...).
    errors: BTreeMap<String, String>,
    view: View,
    outbox: Option<PageRequest>,
}

impl Dashboard {
    /// Build a dashboard, restoring favorites and preferences from `storage`.
    ///
    /// `defaults` is used when no preferences were stored (or they are
    /// unreadable).  Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(
        sources: Sources,
        storage: Arc<dyn KeyValueStore>,
        defaults: Preferences,
        merger: FeedMerger,
    ) -> Self {
        let mut prefs = PreferencesStore::new(defaults);
        if let Some(saved) = load_preferences(storage.as_ref()) {
            prefs.load(saved);
        }
        let favorites = FavoritesStore::hydrate(storage.clone());

        Self {
            sources,
            storage,
            prefs,
            favorites,
            pagination: Pagination::new(),
            merger,
            in_flight: None,
            exhausted: false,
            errors: BTreeMap::new(),
            view: View::Feed,
            outbox: None,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn preferences(&self) -> &Preferences {
        self.prefs.get()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn feed(&self) -> &[FeedItem] {
        self.merger.items()
    }

    pub fn cursors(&self) -> Cursors {
        self.pagination.cursors()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether scrolling to the end should ask for another page.
    pub fn has_more(&self) -> bool {
        self.view == View::Feed && !self.exhausted
    }

    /// The list currently on screen.
    pub fn display_items(&self) -> &[FeedItem] {
        match self.view {
            View::Feed => self.merger.items(),
            View::Favorites => self.favorites.items(),
        }
    }

    /// Placeholder text for an empty list.
    pub fn empty_message(&self) -> &'static str {
        match self.view {
            View::Favorites => "No favorites yet. Start adding items to your favorites!",
            View::Feed if self.prefs.active_query().is_some() => {
                "No results found. Try a different search term."
            }
            View::Feed if self.prefs.get().categories.is_empty() => {
                "Please select at least one category to see content."
            }
            View::Feed => "No content available. Try different categories or search.",
        }
    }

    /// The queued page request, if any.
    pub fn take_request(&mut self) -> Option<PageRequest> {
        self.outbox.take()
    }

    // -- feed ----------------------------------------------------------------

    /// Drop the feed and start again from page 1.
    pub fn refresh(&mut self) {
        self.pagination.reset_all();
        self.merger.clear();
        self.errors.clear();
        self.exhausted = false;
        self.queue_current_page();
    }

    /// Ask for the next page.  Returns whether a request was queued.
    pub fn load_more(&mut self) -> bool {
        if self.view != View::Feed || self.in_flight.is_some() || self.exhausted {
            return false;
        }
        self.pagination.advance_all();
        self.queue_current_page();
        self.outbox.is_some()
    }

    /// Merge a fetched page.  Returns `false` when it was stale and dropped.
    pub fn apply(&mut self, msg: FetchMsg) -> bool {
        let FetchMsg::Page(mut result) = msg;

        if self.in_flight != Some(result.generation) {
            tracing::debug!(
                generation = result.generation,
                current = self.pagination.generation(),
                "Dropping stale page"
            );
            return false;
        }
        self.in_flight = None;

        for outcome in &result.outcomes {
            let label = outcome.request.label();
            match &outcome.result {
                Ok(_) => {
                    self.errors.remove(&label);
                }
                Err(e) => {
                    self.errors.insert(label, e.to_string());
                }
            }
        }

        self.exhausted = !result.any_has_more();
        let first_page = result.first_page;
        let added = self.merger.merge(result.item_lists(), first_page);
        tracing::info!(
            added,
            total = self.merger.len(),
            first_page,
            failed = self.errors.len(),
            "Merged page"
        );
        true
    }

    fn queue_current_page(&mut self) {
        let cursors = self.pagination.cursors();
        let fetches = plan_page(&self.prefs, cursors, &self.sources);
        if fetches.is_empty() {
            tracing::debug!("Nothing to fetch for current filters");
            self.in_flight = None;
            self.exhausted = true;
            self.outbox = None;
            return;
        }

        let generation = self.pagination.generation();
        self.in_flight = Some(generation);
        self.outbox = Some(PageRequest {
            generation,
            first_page: cursors.is_first_page(),
            fetches,
        });
    }

    // -- preferences ---------------------------------------------------------

    pub fn toggle_category(&mut self, category: Category) {
        self.prefs.toggle_category(category);
        self.persist_preferences();
        self.refresh();
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.prefs.set_categories(categories);
        self.persist_preferences();
        self.refresh();
    }

    /// Replace the search query.  An unchanged query is a no-op.
    pub fn set_search_query(&mut self, query: &str) {
        if self.prefs.get().search_query == query {
            return;
        }
        self.prefs.set_search_query(query);
        self.refresh();
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.prefs.set_dark_mode(dark);
        self.persist_preferences();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.prefs.toggle_dark_mode();
        self.persist_preferences();
    }

    fn persist_preferences(&self) {
        let result = serde_json::to_string(self.prefs.get())
            .map_err(crate::error::StoreError::from)
            .and_then(|json| self.storage.set(PREFERENCES_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not persist preferences");
        }
    }

    // -- favorites -----------------------------------------------------------

    pub fn is_favorite(&self, item: &FeedItem) -> bool {
        self.favorites.contains(&item.key())
    }

    /// Returns whether `item` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item: &FeedItem) -> bool {
        self.favorites.toggle(item)
    }

    pub fn remove_favorite(&mut self, key: &ItemKey) {
        self.favorites.remove(key);
    }

    pub fn move_favorite(&mut self, from: usize, to: usize) {
        self.favorites.move_item(from, to);
    }

    // -- view ----------------------------------------------------------------

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Feed => View::Favorites,
            View::Favorites => View::Feed,
        };
    }
}

fn load_preferences(storage: &dyn KeyValueStore) -> Option<Preferences> {
    match storage.get(PREFERENCES_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                tracing::warn!(error = %e, "Stored preferences are malformed, using defaults");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read stored preferences, using defaults");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
