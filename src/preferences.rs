//! Active category filters, search query and display mode.
//!
//! Mutations only touch memory.  Resetting pagination and persisting are the
//! job of whoever observes the change (see [`crate::dashboard`]).

use serde::{Deserialize, Serialize};

use crate::source::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Active categories, in the order they were switched on.
    pub categories: Vec<Category>,
    pub dark_mode: bool,
    /// Transient: never written to storage.
    #[serde(skip)]
    pub search_query: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            categories: vec![Category::Technology, Category::Sports],
            dark_mode: false,
            search_query: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreferencesStore {
    state: Preferences,
}

impl PreferencesStore {
    pub fn new(state: Preferences) -> Self {
        Self { state }
    }

    pub fn get(&self) -> &Preferences {
        &self.state
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.state.categories.contains(&category)
    }

    /// Active categories in the stable fetch order, regardless of the order
    /// they were switched on.
    pub fn active_in_fetch_order(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_active(*c))
            .collect()
    }

    /// The trimmed search query, or `None` when no search is active.
    pub fn active_query(&self) -> Option<&str> {
        let q = self.state.search_query.trim();
        (!q.is_empty()).then_some(q)
    }

    pub fn toggle_category(&mut self, category: Category) {
        if let Some(index) = self.state.categories.iter().position(|c| *c == category) {
            self.state.categories.remove(index);
        } else {
            self.state.categories.push(category);
        }
    }

    /// Replace the active set.  Duplicates are dropped, first occurrence wins.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        let mut unique = Vec::with_capacity(categories.len());
        for c in categories {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        self.state.categories = unique;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.state.dark_mode = dark;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.state.dark_mode = !self.state.dark_mode;
    }

    /// Replace every preference at once (startup restore).
    pub fn load(&mut self, state: Preferences) {
        self.state = state;
    }
}
