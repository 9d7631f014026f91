//! News articles from a NewsAPI-compatible provider.
//!
//! Category pages come from `/top-headlines`, search pages from
//! `/everything`.  [`NewsApiSource::parse_response`] is a pure function so
//! tests can exercise normalisation without the network.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{DataSource, FeedItem, NewsItem, NewsOutlet, Page, Selector};
use crate::error::SourceError;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
const PLACEHOLDER_IMAGE: &str = "/placeholder-news.jpg";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: Option<NewsOutlet>,
    title: Option<String>,
    description: Option<String>,
    url: String,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

pub struct NewsApiSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl NewsApiSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Normalise a raw provider body into a [`Page`].
    pub fn parse_response(body: &[u8], page: u32, page_size: u32) -> Result<Page, SourceError> {
        let response: NewsResponse = serde_json::from_slice(body)?;

        let items = response
            .articles
            .into_iter()
            .enumerate()
            .map(|(index, article)| {
                // Unparseable dates degrade to "no date" rather than failing the page.
                let published_at = article
                    .published_at
                    .as_deref()
                    .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                FeedItem::News(NewsItem {
                    id: format!("{}-{index}", article.url),
                    title: article.title.unwrap_or_else(|| "(untitled)".to_string()),
                    description: article.description.unwrap_or_default(),
                    url_to_image: article
                        .url_to_image
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                    url: article.url,
                    published_at,
                    source: article.source.unwrap_or(NewsOutlet {
                        id: None,
                        name: "Unknown".to_string(),
                    }),
                })
            })
            .collect();

        let seen = u64::from(page) * u64::from(page_size);
        Ok(Page {
            items,
            has_more: seen < response.total_results,
        })
    }
}

#[async_trait]
impl DataSource for NewsApiSource {
    fn name(&self) -> &str {
        "news"
    }

    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("news"))?;
        let page_size = self.page_size.to_string();
        let page_str = page.to_string();

        let request = match selector {
            Selector::Category(category) => self
                .client
                .get(format!("{}/top-headlines", self.base_url))
                .query(&[
                    ("category", category.as_str()),
                    ("country", "us"),
                    ("apiKey", api_key),
                    ("pageSize", page_size.as_str()),
                    ("page", page_str.as_str()),
                ]),
            Selector::Search(query) => self
                .client
                .get(format!("{}/everything", self.base_url))
                .query(&[
                    ("q", query.as_str()),
                    ("apiKey", api_key),
                    ("pageSize", page_size.as_str()),
                    ("page", page_str.as_str()),
                    ("sortBy", "publishedAt"),
                ]),
            Selector::Default => {
                return Err(SourceError::Unsupported {
                    adapter: "news",
                    selector: selector.to_string(),
                })
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        let parsed = Self::parse_response(&body, page, self.page_size)?;
        tracing::debug!(%selector, page, items = parsed.items.len(), "news page fetched");
        Ok(parsed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
