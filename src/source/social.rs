//! Social posts.
//!
//! The social feed has a tiny JSON contract, `GET /social?page=N` returning
//! [`SocialResponse`].  [`HttpSocialSource`] reads it from a server;
//! [`MockSocialSource`] produces the same responses in-process via
//! [`respond`], which is what the dashboard uses when no social endpoint is
//! configured.
//!
//! Social posts cannot be searched: while a search query is active this
//! source is not asked for pages at all.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{DataSource, FeedItem, Page, Selector, SocialPost};
use crate::error::SourceError;

pub const PAGE_SIZE: u32 = 10;
/// Pages after this one report `has_more = false`.
pub const LAST_PAGE: u32 = 5;

const MOCK_AUTHORS: [&str; 8] = [
    "John Doe",
    "Jane Smith",
    "Mike Johnson",
    "Sarah Williams",
    "Alex Brown",
    "Emily Davis",
    "Chris Wilson",
    "Lisa Anderson",
];

const MOCK_CONTENT: [&str; 10] = [
    "Just finished an amazing project! Feeling proud of what we accomplished. 🚀",
    "Learning something new every day. The journey never stops! 📚",
    "Beautiful sunset today. Sometimes you need to pause and appreciate the moment. 🌅",
    "Tech conference was incredible! Met so many inspiring people. 💡",
    "Coffee and code - the perfect combination for a productive morning. ☕",
    "Excited to share my latest creation with you all. Stay tuned! ✨",
    "Reminder: Take breaks, stay hydrated, and be kind to yourself. 💙",
    "Just deployed to production. That feeling never gets old! 🎉",
    "Working on something special. Can't wait to reveal it! 🔥",
    "Grateful for this amazing community. You all inspire me daily! 🙏",
];

/// Wire shape of one social page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialResponse {
    pub posts: Vec<SocialPost>,
    pub has_more: bool,
    pub next_page: u32,
}

impl From<SocialResponse> for Page {
    fn from(response: SocialResponse) -> Self {
        Page {
            items: response.posts.into_iter().map(FeedItem::Social).collect(),
            has_more: response.has_more,
        }
    }
}

// ---------------------------------------------------------------------------
// Mock endpoint
// ---------------------------------------------------------------------------

/// Generate `page_size` posts for `page`.
///
/// Author, content, avatar and id depend only on the post's absolute index,
/// so the same page always carries the same pairings.  Timestamp, likes and
/// comments are random on every call.
pub fn generate_posts(page: u32, page_size: u32, rng: &mut impl Rng) -> Vec<SocialPost> {
    let start = page.max(1).saturating_sub(1) as usize * page_size as usize;
    let week_ms: i64 = 7 * 24 * 60 * 60 * 1000;

    (start..start + page_size as usize)
        .map(|index| SocialPost {
            id: format!("post-{index}"),
            author: MOCK_AUTHORS[index % MOCK_AUTHORS.len()].to_string(),
            content: MOCK_CONTENT[index % MOCK_CONTENT.len()].to_string(),
            avatar: format!("https://i.pravatar.cc/150?img={}", (index % 70) + 1),
            timestamp: Utc::now() - chrono::Duration::milliseconds(rng.gen_range(0..week_ms)),
            likes: rng.gen_range(0..500),
            comments: rng.gen_range(0..100),
        })
        .collect()
}

/// Answer `GET /social?page={page}`.
pub fn respond(page: u32) -> SocialResponse {
    let posts = generate_posts(page, PAGE_SIZE, &mut rand::thread_rng());
    let has_more = page < LAST_PAGE;
    SocialResponse {
        posts,
        has_more,
        next_page: if has_more { page + 1 } else { page },
    }
}

/// Serves [`respond`] in-process, optionally after a simulated delay.
#[derive(Debug, Clone, Default)]
pub struct MockSocialSource {
    latency: Duration,
}

impl MockSocialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl DataSource for MockSocialSource {
    fn name(&self) -> &str {
        "social"
    }

    fn supports_search(&self) -> bool {
        false
    }

    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
        if *selector != Selector::Default {
            return Err(SourceError::Unsupported {
                adapter: "social",
                selector: selector.to_string(),
            });
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(respond(page).into())
    }
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

pub struct HttpSocialSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSocialSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DataSource for HttpSocialSource {
    fn name(&self) -> &str {
        "social"
    }

    fn supports_search(&self) -> bool {
        false
    }

    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
        if *selector != Selector::Default {
            return Err(SourceError::Unsupported {
                adapter: "social",
                selector: selector.to_string(),
            });
        }

        let response = self
            .client
            .get(format!("{}/social", self.base_url))
            .query(&[("page", page)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        let parsed: SocialResponse = serde_json::from_slice(&body)?;
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn page_six_is_past_the_end() {
        let response = respond(6);
        assert!(!response.has_more);
        assert_eq!(response.next_page, 6);
        assert_eq!(response.posts.len(), PAGE_SIZE as usize);
    }

    #[test]
    fn early_pages_point_to_the_next_one() {
        let response = respond(1);
        assert!(response.has_more);
        assert_eq!(response.next_page, 2);

        let response = respond(4);
        assert!(response.has_more);
        assert_eq!(response.next_page, 5);

        let response = respond(5);
        assert!(!response.has_more);
        assert_eq!(response.next_page, 5);
    }

    #[test]
    fn posts_are_derived_from_absolute_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let posts = generate_posts(2, 10, &mut rng);
        assert_eq!(posts[0].id, "post-10");
        assert_eq!(posts[0].author, MOCK_AUTHORS[10 % 8]);
        assert_eq!(posts[0].content, MOCK_CONTENT[0]);
        assert_eq!(posts[0].avatar, "https://i.pravatar.cc/150?img=11");
        assert!(posts.iter().all(|p| p.likes < 500 && p.comments < 100));
    }

    #[test]
    fn same_page_keeps_author_content_pairing() {
        let a = respond(3);
        let b = respond(3);
        let pairs = |r: &SocialResponse| {
            r.posts
                .iter()
                .map(|p| (p.id.clone(), p.author.clone(), p.content.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&a), pairs(&b));
    }

    #[test]
    fn response_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(respond(1)).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["nextPage"], 2);
        assert_eq!(json["posts"][0]["id"], "post-0");
    }

    #[tokio::test]
    async fn mock_source_refuses_search() {
        let source = MockSocialSource::new();
        assert!(!source.supports_search());
        let err = source
            .fetch_page(&Selector::Search("ai".into()), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn http_source_reads_mock_endpoint_contract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/social"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(respond(2)))
            .mount(&server)
            .await;

        let source = HttpSocialSource::new(reqwest::Client::new(), server.uri());
        let page = source.fetch_page(&Selector::Default, 2).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert!(page.has_more);
        assert_eq!(page.items[0].key(), crate::source::ItemKey::Social("post-10".into()));
    }
}
