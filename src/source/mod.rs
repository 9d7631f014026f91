//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait, the common [`FeedItem`]
//! type and the vocabulary shared by every adapter ([`Category`],
//! [`Selector`], [`Page`]).  Concrete adapters live in sub-modules:
//! [`news`] (NewsAPI), [`movies`] (TMDB) and [`social`] (the social-post
//! endpoint, plus an in-process mock of it).
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `podcasts.rs`).
//! 2. Define a struct holding its configuration and implement [`DataSource`]
//!    for it, normalising the provider response into [`FeedItem`] values.
//! 3. Add a variant to [`SourceKind`] and a slot to [`Sources`].
//! 4. Teach [`crate::fetch::plan_page`] when to ask it for a page.
//!
//! Merging, favorites and the UI are source-agnostic.

mod feed_item;
pub mod movies;
pub mod news;
pub mod social;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use feed_item::{FeedItem, ItemKey, ItemKind, MovieItem, NewsItem, NewsOutlet, SocialPost};
pub use movies::TmdbSource;
pub use news::NewsApiSource;
pub use social::{HttpSocialSource, MockSocialSource};

#[cfg(test)]
pub(crate) use feed_item::tests as fixtures;

use crate::error::SourceError;

// ---------------------------------------------------------------------------
// Categories and selectors
// ---------------------------------------------------------------------------

/// News category a user can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Sports,
    Business,
    Entertainment,
    Health,
    Science,
}

impl Category {
    /// Every category, in the stable order used for fetching and merging.
    pub const ALL: [Category; 6] = [
        Category::Technology,
        Category::Sports,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
    ];

    /// Token the news provider expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single fetch asks a source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Headlines for one news category.
    Category(Category),
    /// Free-text search.
    Search(String),
    /// The source's unfiltered stream (trending movies, social timeline).
    Default,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Category(c) => write!(f, "category {c}"),
            Selector::Search(q) => write!(f, "search {q:?}"),
            Selector::Default => f.write_str("default feed"),
        }
    }
}

/// One page of normalised items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<FeedItem>,
    /// Whether the provider reports further pages after this one.
    pub has_more: bool,
}

// ---------------------------------------------------------------------------
// The adapter trait
// ---------------------------------------------------------------------------

/// Which of the three feeds a source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    News,
    Movies,
    Social,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::News => "news",
            SourceKind::Movies => "movies",
            SourceKind::Social => "social",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait that every data source must implement.
///
/// Fetches run on tokio tasks, so implementations must be [`Send`] and
/// [`Sync`].  An adapter does its own HTTP/IO work and returns a [`Page`] of
/// normalised [`FeedItem`] values, or a [`SourceError`] which the dashboard
/// records without failing the rest of the page.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl DataSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
///         // Perform HTTP / IO, then convert into FeedItem values.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Whether [`Selector::Search`] is served.  Sources that cannot search
    /// are skipped entirely while a search query is active.
    fn supports_search(&self) -> bool {
        true
    }

    /// Fetch page `page` (1-based) for `selector`.
    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError>;
}

/// The three adapters the dashboard reads from.
#[derive(Clone)]
pub struct Sources {
    pub news: Arc<dyn DataSource>,
    pub movies: Arc<dyn DataSource>,
    pub social: Arc<dyn DataSource>,
}

impl Sources {
    pub fn get(&self, kind: SourceKind) -> &Arc<dyn DataSource> {
        match kind {
            SourceKind::News => &self.news,
            SourceKind::Movies => &self.movies,
            SourceKind::Social => &self.social,
        }
    }
}
