//! End-to-end paging through the real adapters against mock HTTP providers.

use std::sync::Arc;
use std::time::Duration;

use feedboard::dashboard::Dashboard;
use feedboard::fetch::{fetch_page, FetchMsg};
use feedboard::merger::{FeedMerger, Interleave};
use feedboard::preferences::Preferences;
use feedboard::source::{Category, FeedItem, ItemKind, MockSocialSource, NewsApiSource, Sources, TmdbSource};
use feedboard::storage::MemoryStore;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NEWS: &str = r#"{
    "status": "ok",
    "totalResults": 2,
    "articles": [
        {"source": {"id": null, "name": "Wire"}, "title": "Chips", "description": "d",
         "url": "https://wire.test/chips", "urlToImage": null,
         "publishedAt": "2025-03-01T10:00:00Z"},
        {"source": {"id": "ap", "name": "AP"}, "title": "Cup final", "description": null,
         "url": "https://ap.test/cup", "urlToImage": "https://ap.test/cup.jpg",
         "publishedAt": "yesterday"}
    ]
}"#;

const MOVIES: &str = r#"{
    "page": 1,
    "total_pages": 1,
    "results": [
        {"id": 1, "title": "One", "overview": "", "poster_path": "/1.jpg",
         "backdrop_path": null, "vote_average": 7.5, "release_date": "2024-01-01"},
        {"id": 2, "title": "Two", "overview": "", "poster_path": null,
         "backdrop_path": null, "vote_average": 6.0, "release_date": ""},
        {"id": 3, "title": "Three", "overview": "", "poster_path": null,
         "backdrop_path": null, "vote_average": 8.1, "release_date": "2023-05-05"}
    ]
}"#;

async fn providers() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/everything"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tmdb/trending/movie/week"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MOVIES))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tmdb/search/movie"))
        .and(query_param("query", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MOVIES))
        .mount(&server)
        .await;
    server
}

fn sources(server: &MockServer, news_key: Option<&str>) -> Sources {
    let client = reqwest::Client::new();
    Sources {
        news: Arc::new(NewsApiSource::new(
            client.clone(),
            format!("{}/news", server.uri()),
            news_key.map(str::to_string),
        )),
        movies: Arc::new(TmdbSource::new(
            client,
            format!("{}/tmdb", server.uri()),
            Some("tmdb-key".to_string()),
        )),
        social: Arc::new(MockSocialSource::with_latency(Duration::ZERO)),
    }
}

fn dashboard(sources: Sources) -> Dashboard {
    Dashboard::new(
        sources,
        Arc::new(MemoryStore::new()),
        Preferences::default(),
        FeedMerger::new(Interleave::Shuffle, Some(7)),
    )
}

/// Run the queued request to completion and apply it.
async fn settle(dash: &mut Dashboard, sources: &Sources) -> bool {
    let request = dash.take_request().expect("a page should be queued");
    let result = fetch_page(sources, request, Duration::from_secs(5)).await;
    dash.apply(FetchMsg::Page(result))
}

fn count(items: &[FeedItem], kind: ItemKind) -> usize {
    items.iter().filter(|i| i.kind() == kind).count()
}

#[tokio::test]
async fn first_page_combines_every_source() {
    let server = providers().await;
    let srcs = sources(&server, Some("news-key"));
    let mut dash = dashboard(srcs.clone());

    dash.refresh();
    assert!(settle(&mut dash, &srcs).await);

    let feed = dash.feed();
    assert_eq!(feed.len(), 2 + 2 + 3 + 10);
    assert_eq!(count(feed, ItemKind::News), 4);
    assert_eq!(count(feed, ItemKind::Movie), 3);
    assert_eq!(count(feed, ItemKind::Social), 10);
    assert!(dash.errors().is_empty());
    assert!(dash.has_more());
}

#[tokio::test]
async fn paging_stops_when_no_source_has_more() {
    let server = providers().await;
    let srcs = sources(&server, Some("news-key"));
    let mut dash = dashboard(srcs.clone());

    dash.refresh();
    settle(&mut dash, &srcs).await;
    let mut pages = 1;
    while dash.load_more() {
        settle(&mut dash, &srcs).await;
        pages += 1;
        assert!(pages <= 10, "paging never stopped");
    }

    // The generated social feed ends after page 5; news and movies report
    // no further pages after the first.
    assert_eq!(pages, 5);
    assert!(!dash.has_more());
    assert_eq!(dash.cursors().social, 5);
    assert_eq!(count(dash.feed(), ItemKind::Social), 50);
}

#[tokio::test]
async fn search_queries_news_and_movies_only() {
    let server = providers().await;
    let srcs = sources(&server, Some("news-key"));
    let mut dash = dashboard(srcs.clone());

    dash.set_search_query("  rust ");
    settle(&mut dash, &srcs).await;

    assert_eq!(dash.feed().len(), 2 + 3);
    assert_eq!(count(dash.feed(), ItemKind::Social), 0);
    assert!(dash.errors().is_empty());
}

#[tokio::test]
async fn missing_news_key_is_reported_per_category() {
    let server = providers().await;
    let srcs = sources(&server, None);
    let mut dash = dashboard(srcs.clone());

    dash.set_categories(vec![Category::Health]);
    settle(&mut dash, &srcs).await;

    let labels: Vec<&String> = dash.errors().keys().collect();
    assert_eq!(labels, vec!["news/health"]);
    // The other sources still fill the page.
    assert_eq!(dash.feed().len(), 3 + 10);
}

#[tokio::test]
async fn provider_outage_leaves_the_rest_of_the_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let srcs = sources(&server, Some("news-key"));
    let mut dash = dashboard(srcs.clone());

    dash.refresh();
    settle(&mut dash, &srcs).await;

    assert_eq!(dash.errors().len(), 3);
    assert_eq!(dash.feed().len(), 10);
    assert!(dash.has_more());
}
