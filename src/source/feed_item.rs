//! The core data type shared across all feed sources.
//!
//! `FeedItem` is a tagged union over the three kinds of content the dashboard
//! shows: news articles, movies and social posts.  Every source converts its
//! provider-specific response into one of these variants so the rest of the
//! application (merging, favorites, rendering) stays source-agnostic.
//!
//! ## Identity
//!
//! Each variant carries an id that is unique *within its kind*: a string for
//! news and social posts, an integer for movies.  [`ItemKey`] pairs the kind
//! with the id, so a movie with id `5` and a social post with id `"5"` can
//! never be mistaken for one another.
//!
//! ## Serialized shape
//!
//! Items serialize with a `"type"` tag (`news`, `movie`, `social`) and keep
//! the providers' field names (`urlToImage`, `publishedAt`, `poster_path`,
//! ...).  That JSON is also the favorites storage format.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed entry, normalised from any data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedItem {
    News(NewsItem),
    Movie(MovieItem),
    Social(SocialPost),
}

/// The publisher an article came from, as reported by the news provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsOutlet {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// `"{url}-{index}"`, where `index` is the position in the provider page.
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub url_to_image: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: NewsOutlet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub backdrop_path: String,
    pub vote_average: f64,
    /// `YYYY-MM-DD`, or empty when the provider has no date.
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub author: String,
    pub content: String,
    pub avatar: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub comments: u32,
}

// ---------------------------------------------------------------------------
// Kind and identity
// ---------------------------------------------------------------------------

/// Discriminant of a [`FeedItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    News,
    Movie,
    Social,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::News => "news",
            ItemKind::Movie => "movie",
            ItemKind::Social => "social",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-qualified identity of a [`FeedItem`].
///
/// Two items are "the same item" iff their keys are equal.  Because the kind
/// is part of the key, ids from different kinds never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    News(String),
    Movie(i64),
    Social(String),
}

impl ItemKey {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemKey::News(_) => ItemKind::News,
            ItemKey::Movie(_) => ItemKind::Movie,
            ItemKey::Social(_) => ItemKind::Social,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::News(id) => write!(f, "news:{id}"),
            ItemKey::Movie(id) => write!(f, "movie:{id}"),
            ItemKey::Social(id) => write!(f, "social:{id}"),
        }
    }
}

impl FeedItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            FeedItem::News(_) => ItemKind::News,
            FeedItem::Movie(_) => ItemKind::Movie,
            FeedItem::Social(_) => ItemKind::Social,
        }
    }

    pub fn key(&self) -> ItemKey {
        match self {
            FeedItem::News(n) => ItemKey::News(n.id.clone()),
            FeedItem::Movie(m) => ItemKey::Movie(m.id),
            FeedItem::Social(s) => ItemKey::Social(s.id.clone()),
        }
    }

    /// Whether `self` and `other` refer to the same underlying item.
    pub fn same_item(&self, other: &FeedItem) -> bool {
        match (self, other) {
            (FeedItem::News(a), FeedItem::News(b)) => a.id == b.id,
            (FeedItem::Movie(a), FeedItem::Movie(b)) => a.id == b.id,
            (FeedItem::Social(a), FeedItem::Social(b)) => a.id == b.id,
            _ => false,
        }
    }

    /// Headline shown in the list: article/movie title or the post author.
    pub fn headline(&self) -> &str {
        match self {
            FeedItem::News(n) => &n.title,
            FeedItem::Movie(m) => &m.title,
            FeedItem::Social(s) => &s.author,
        }
    }

    /// Article link, for items that have one.
    pub fn link(&self) -> Option<&str> {
        match self {
            FeedItem::News(n) if !n.url.is_empty() => Some(&n.url),
            _ => None,
        }
    }

    /// Secondary text: description, overview or post body.
    pub fn body(&self) -> &str {
        match self {
            FeedItem::News(n) => &n.description,
            FeedItem::Movie(m) => &m.overview,
            FeedItem::Social(s) => &s.content,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
