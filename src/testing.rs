//! In-memory data source for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::SourceError;
use crate::source::{
    Category, DataSource, FeedItem, MovieItem, NewsItem, NewsOutlet, Page, Selector, SocialPost,
};

/// Returns `per_page` generated items for any selector and page, unless told
/// to fail.  Item ids encode selector and page so pages never overlap.
pub struct StubSource {
    name: &'static str,
    per_page: usize,
    per_category: HashMap<Category, usize>,
    fail: bool,
    has_more: bool,
    delay: Duration,
    calls: Mutex<Vec<(Selector, u32)>>,
}

impl StubSource {
    /// `name` picks the item kind: `"movies"`, `"social"`, anything else is news.
    pub fn new(name: &'static str, per_page: usize) -> Self {
        Self {
            name,
            per_page,
            per_category: HashMap::new(),
            fail: false,
            has_more: true,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, 0)
        }
    }

    pub fn with_category_count(mut self, category: Category, count: usize) -> Self {
        self.per_category.insert(category, count);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn exhausted(mut self) -> Self {
        self.has_more = false;
        self
    }

    pub fn calls(&self) -> Vec<(Selector, u32)> {
        self.calls.lock().unwrap().clone()
    }

    fn item(&self, tag: &str, page: u32, index: usize) -> FeedItem {
        let id = format!("{tag}-{page}-{index}");
        match self.name {
            "movies" => FeedItem::Movie(MovieItem {
                id: i64::from(page) * 100_000 + (tag.len() as i64) * 1_000 + index as i64,
                title: id,
                overview: String::new(),
                poster_path: String::new(),
                backdrop_path: String::new(),
                vote_average: 5.0,
                release_date: String::new(),
            }),
            "social" => FeedItem::Social(SocialPost {
                id,
                author: "stub".to_string(),
                content: String::new(),
                avatar: String::new(),
                timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                likes: 0,
                comments: 0,
            }),
            _ => FeedItem::News(NewsItem {
                id: id.clone(),
                title: id,
                description: String::new(),
                url: String::new(),
                url_to_image: String::new(),
                published_at: None,
                source: NewsOutlet {
                    id: None,
                    name: "stub".to_string(),
                },
            }),
        }
    }
}

#[async_trait]
impl DataSource for StubSource {
    fn name(&self) -> &str {
        self.name
    }

    fn supports_search(&self) -> bool {
        self.name != "social"
    }

    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
        self.calls.lock().unwrap().push((selector.clone(), page));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(SourceError::Status(500));
        }

        let (tag, count) = match selector {
            Selector::Category(c) => (
                c.as_str().to_string(),
                self.per_category.get(c).copied().unwrap_or(self.per_page),
            ),
            Selector::Search(q) => (format!("search:{q}"), self.per_page),
            Selector::Default => ("default".to_string(), self.per_page),
        };
        Ok(Page {
            items: (0..count).map(|i| self.item(&tag, page, i)).collect(),
            has_more: self.has_more,
        })
    }
}
