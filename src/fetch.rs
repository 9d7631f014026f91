//! Page fetching.
//!
//! [`plan_page`] decides which source fetches make up one page, given the
//! current preferences and cursors.  [`spawn_page`] runs those fetches on a
//! tokio task, all concurrently, each under its own timeout, and sends the
//! collected outcomes back to the UI loop as one [`FetchMsg`].
//!
//! ## For contributors
//!
//! The page is joined before it is sent: every planned fetch has either
//! finished or timed out by the time the UI sees the message, so a slow
//! source can never leak its items into a later page.

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;

use crate::error::SourceError;
use crate::pagination::Cursors;
use crate::preferences::PreferencesStore;
use crate::source::{FeedItem, Page, Selector, SourceKind, Sources};

/// Default per-fetch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One fetch from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: SourceKind,
    pub selector: Selector,
    pub page: u32,
}

impl FetchRequest {
    /// Short label for logs and the status bar, e.g. `news/technology`.
    pub fn label(&self) -> String {
        match &self.selector {
            Selector::Category(c) => format!("{}/{c}", self.kind),
            Selector::Search(_) => format!("{}/search", self.kind),
            Selector::Default => self.kind.to_string(),
        }
    }
}

/// Every fetch of one page, in merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Pagination generation the request was issued under.
    pub generation: u64,
    /// Whether every cursor was on page 1.
    pub first_page: bool,
    pub fetches: Vec<FetchRequest>,
}

/// Build the fetch list for the page the cursors point at.
///
/// With a search query: news search, then movie search, plus any other
/// source that can search.  Sources that cannot search are skipped.
/// Without a query: one news fetch per active category in stable order, then
/// trending movies, then social.  No active categories plans nothing.
pub fn plan_page(prefs: &PreferencesStore, cursors: Cursors, sources: &Sources) -> Vec<FetchRequest> {
    let mut fetches = Vec::new();

    if let Some(query) = prefs.active_query() {
        for kind in [SourceKind::News, SourceKind::Movies, SourceKind::Social] {
            if sources.get(kind).supports_search() {
                fetches.push(FetchRequest {
                    kind,
                    selector: Selector::Search(query.to_string()),
                    page: cursors.get(kind),
                });
            } else {
                tracing::debug!(source = %kind, "Skipping source without search support");
            }
        }
        return fetches;
    }

    let categories = prefs.active_in_fetch_order();
    if categories.is_empty() {
        return fetches;
    }

    for category in categories {
        fetches.push(FetchRequest {
            kind: SourceKind::News,
            selector: Selector::Category(category),
            page: cursors.news,
        });
    }
    fetches.push(FetchRequest {
        kind: SourceKind::Movies,
        selector: Selector::Default,
        page: cursors.movies,
    });
    fetches.push(FetchRequest {
        kind: SourceKind::Social,
        selector: Selector::Default,
        page: cursors.social,
    });
    fetches
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Page, SourceError>,
}

#[derive(Debug)]
pub struct PageResult {
    pub generation: u64,
    pub first_page: bool,
    /// Same order as [`PageRequest::fetches`].
    pub outcomes: Vec<FetchOutcome>,
}

impl PageResult {
    /// Item lists in merge order; failed fetches contribute empty lists.
    pub fn item_lists(&mut self) -> Vec<Vec<FeedItem>> {
        self.outcomes
            .iter_mut()
            .map(|o| match &mut o.result {
                Ok(page) => std::mem::take(&mut page.items),
                Err(_) => Vec::new(),
            })
            .collect()
    }

    /// Whether any fetch reported further pages.
    pub fn any_has_more(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(&o.result, Ok(page) if page.has_more))
    }
}

/// Messages sent from fetch tasks to the UI loop.
#[derive(Debug)]
pub enum FetchMsg {
    Page(PageResult),
}

// ---------------------------------------------------------------------------
// Running fetches
// ---------------------------------------------------------------------------

async fn fetch_one(sources: &Sources, request: FetchRequest, timeout: Duration) -> FetchOutcome {
    let source = sources.get(request.kind);
    let result =
        match tokio::time::timeout(timeout, source.fetch_page(&request.selector, request.page)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(timeout)),
        };
    if let Err(e) = &result {
        tracing::warn!(
            source = source.name(),
            fetch = %request.label(),
            page = request.page,
            error = %e,
            "Fetch failed"
        );
    }
    FetchOutcome { request, result }
}

/// Run every fetch of `request` concurrently and collect the outcomes.
pub async fn fetch_page(sources: &Sources, request: PageRequest, timeout: Duration) -> PageResult {
    let outcomes = join_all(
        request
            .fetches
            .into_iter()
            .map(|fetch| fetch_one(sources, fetch, timeout)),
    )
    .await;

    PageResult {
        generation: request.generation,
        first_page: request.first_page,
        outcomes,
    }
}

/// Spawn a task that fetches `request` and sends the result on `tx`.
///
/// If the receiver is gone the UI has exited and the result is dropped.
pub fn spawn_page(
    sources: Sources,
    request: PageRequest,
    timeout: Duration,
    tx: mpsc::UnboundedSender<FetchMsg>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = fetch_page(&sources, request, timeout).await;
        let _ = tx.send(FetchMsg::Page(result));
    })
}
