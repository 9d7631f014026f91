use std::time::Duration;

use thiserror::Error;

/// Failure of a single source fetch.
///
/// Never fatal: the failing fetch contributes no items to the page being
/// merged and the error is kept for the status bar.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{adapter} cannot serve {selector}")]
    Unsupported {
        adapter: &'static str,
        selector: String,
    },

    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),
}

/// Failure of the key-value store backing favorites and preferences.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored value: {0}")]
    Json(#[from] serde_json::Error),
}
