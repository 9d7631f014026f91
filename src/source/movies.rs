//! Trending and searched movies from a TMDB-compatible provider.

use async_trait::async_trait;
use serde::Deserialize;

use super::{DataSource, FeedItem, MovieItem, Page, Selector};
use crate::error::SourceError;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w1280";
const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";

#[derive(Debug, Deserialize)]
struct TmdbResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: Option<String>,
    // Providers send both missing keys and explicit nulls.
    #[serde(default)]
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
}

fn image_url(base: &str, path: Option<String>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{base}{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

pub struct TmdbSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Normalise a raw provider body into a [`Page`].
    pub fn parse_response(body: &[u8], page: u32) -> Result<Page, SourceError> {
        let response: TmdbResponse = serde_json::from_slice(body)?;

        let items = response
            .results
            .into_iter()
            .map(|movie| {
                FeedItem::Movie(MovieItem {
                    id: movie.id,
                    title: movie.title.unwrap_or_else(|| "(untitled)".to_string()),
                    overview: movie.overview.unwrap_or_default(),
                    poster_path: image_url(POSTER_BASE, movie.poster_path),
                    backdrop_path: image_url(BACKDROP_BASE, movie.backdrop_path),
                    vote_average: movie.vote_average.unwrap_or_default(),
                    release_date: movie.release_date.unwrap_or_default(),
                })
            })
            .collect();

        Ok(Page {
            items,
            has_more: page < response.total_pages,
        })
    }
}

#[async_trait]
impl DataSource for TmdbSource {
    fn name(&self) -> &str {
        "movies"
    }

    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<Page, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("movies"))?;
        let page_str = page.to_string();

        let request = match selector {
            Selector::Default => self
                .client
                .get(format!("{}/trending/movie/week", self.base_url))
                .query(&[("api_key", api_key), ("page", page_str.as_str())]),
            Selector::Search(query) => self
                .client
                .get(format!("{}/search/movie", self.base_url))
                .query(&[
                    ("api_key", api_key),
                    ("query", query.as_str()),
                    ("page", page_str.as_str()),
                ]),
            Selector::Category(_) => {
                return Err(SourceError::Unsupported {
                    adapter: "movies",
                    selector: selector.to_string(),
                })
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        let parsed = Self::parse_response(&body, page)?;
        tracing::debug!(%selector, page, items = parsed.items.len(), "movie page fetched");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Category;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"{
        "page": 1,
        "results": [
            {
                "adult": false,
                "backdrop_path": "/back.jpg",
                "genre_ids": [28],
                "id": 550,
                "original_language": "en",
                "original_title": "Fight Club",
                "overview": "An insomniac office worker...",
                "popularity": 61.4,
                "poster_path": "/poster.jpg",
                "release_date": "1999-10-15",
                "title": "Fight Club",
                "video": false,
                "vote_average": 8.4,
                "vote_count": 26280
            },
            {
                "id": 1,
                "title": "Bare",
                "poster_path": null,
                "backdrop_path": null
            }
        ],
        "total_pages": 3,
        "total_results": 42
    }"#;

    #[test]
    fn parse_response_builds_image_urls() {
        let page = TmdbSource::parse_response(BODY.as_bytes(), 1).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let FeedItem::Movie(m) = &page.items[0] else {
            panic!("expected a movie");
        };
        assert_eq!(m.id, 550);
        assert_eq!(m.poster_path, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(m.backdrop_path, "https://image.tmdb.org/t/p/w1280/back.jpg");

        let FeedItem::Movie(bare) = &page.items[1] else {
            panic!("expected a movie");
        };
        assert_eq!(bare.poster_path, PLACEHOLDER_IMAGE);
        assert_eq!(bare.backdrop_path, PLACEHOLDER_IMAGE);
        assert_eq!(bare.release_date, "");
    }

    #[test]
    fn null_fields_do_not_drop_the_page() {
        let body = r#"{
            "page": 2,
            "total_pages": 2,
            "results": [
                {"id": 7, "title": "Nulls", "overview": null, "poster_path": null,
                 "backdrop_path": null, "vote_average": null, "release_date": null},
                {"id": 8, "title": "Fine", "overview": "ok", "vote_average": 6.5,
                 "release_date": "2020-02-02"}
            ]
        }"#;
        let page = TmdbSource::parse_response(body.as_bytes(), 2).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more);

        let FeedItem::Movie(m) = &page.items[0] else {
            panic!("expected a movie");
        };
        assert_eq!(m.overview, "");
        assert_eq!(m.release_date, "");
        assert_eq!(m.vote_average, 0.0);
        assert_eq!(m.poster_path, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn final_page_has_no_more() {
        let page = TmdbSource::parse_response(BODY.as_bytes(), 3).unwrap();
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn trending_and_search_use_distinct_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/week"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "heat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": [], "total_pages": 0}"#))
            .expect(1)
            .mount(&server)
            .await;

        let source = TmdbSource::new(reqwest::Client::new(), server.uri(), Some("k".into()));
        let trending = source.fetch_page(&Selector::Default, 1).await.unwrap();
        assert_eq!(trending.items.len(), 2);

        let searched = source.fetch_page(&Selector::Search("heat".into()), 1).await.unwrap();
        assert!(searched.items.is_empty());
        assert!(!searched.has_more);
    }

    #[tokio::test]
    async fn category_selector_is_unsupported() {
        let source = TmdbSource::new(reqwest::Client::new(), "http://127.0.0.1:9", Some("k".into()));
        let err = source
            .fetch_page(&Selector::Category(Category::Health), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unsupported { adapter: "movies", .. }));
    }
}
