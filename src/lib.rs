//! feedboard: news, trending movies and social posts merged into one
//! infinite-scrolling, filterable, favoritable terminal feed.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ FetchMsg  ┌─────────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ────────► │ dashboard.rs│ ───────► │  ui.rs   │
//! │ (tokio)  │ (channel) │  + app.rs   │          │ (render) │
//! └──────────┘           └─────────────┘          └──────────┘
//!      ▲ PageRequest           ▲
//!      └───────────────────────┤ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`**: the `DataSource` trait, the shared `FeedItem` type and
//!   the news, movie and social adapters.
//! * **`fetch`**: plans which fetches make up a page and runs them
//!   concurrently on a tokio task.
//! * **`pagination`**, **`merger`**, **`trigger`**: the infinite-scroll
//!   engine (cursors, page interleaving, the load-more signal).
//! * **`favorites`**, **`preferences`**, **`storage`**: user state and its
//!   persistence.
//! * **`dashboard`**: the coordinator that ties the above together.
//! * **`app`**, **`ui`**, **`input`**: terminal state, rendering and keys;
//!   **`link`** vets item links before they are opened.
//! * **`config`**: the optional TOML config file.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod input;
pub mod link;
pub mod merger;
pub mod pagination;
pub mod preferences;
pub mod source;
pub mod storage;
pub mod trigger;
pub mod ui;

#[cfg(test)]
mod testing;
