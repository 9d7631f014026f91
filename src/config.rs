//! Configuration file parser for ~/.config/feedboard/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`.  Unknown keys are accepted and logged as warnings so
//! a typo does not stop the dashboard from starting.
//!
//! API keys may also come from `NEWS_API_KEY` and `TMDB_API_KEY`; the
//! environment wins over the file.
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::merger::Interleave;
use crate::preferences::Preferences;
use crate::source::Category;
use crate::trigger::DEFAULT_THRESHOLD;

pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// The Debug impl masks both API keys.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,

    pub news_base_url: String,
    pub tmdb_base_url: String,
    /// Social endpoint.  Unset means the built-in generated feed.
    pub social_base_url: Option<String>,
    /// Simulated latency of the built-in social feed.
    pub social_latency_ms: u64,

    pub news_page_size: u32,
    /// Per-fetch timeout.
    pub fetch_timeout_secs: u64,
    /// Visible fraction of the end-of-list sentinel that loads the next page.
    pub load_more_threshold: f32,
    pub interleave: Interleave,
    /// Fixed shuffle seed for a reproducible feed order.
    pub shuffle_seed: Option<u64>,
    pub search_debounce_ms: u64,

    /// Categories used until the user saves their own.
    pub default_categories: Vec<Category>,
    pub dark_mode: bool,

    /// Where favorites, preferences and the log file live.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            tmdb_api_key: None,
            news_base_url: crate::source::news::DEFAULT_BASE_URL.to_string(),
            tmdb_base_url: crate::source::movies::DEFAULT_BASE_URL.to_string(),
            social_base_url: None,
            social_latency_ms: 500,
            news_page_size: crate::source::news::DEFAULT_PAGE_SIZE,
            fetch_timeout_secs: 10,
            load_more_threshold: DEFAULT_THRESHOLD,
            interleave: Interleave::Shuffle,
            shuffle_seed: None,
            search_debounce_ms: 500,
            default_categories: Preferences::default().categories,
            dark_mode: false,
            data_dir: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "news_api_key",
                &self.news_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "tmdb_api_key",
                &self.tmdb_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("news_base_url", &self.news_base_url)
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("social_base_url", &self.social_base_url)
            .field("social_latency_ms", &self.social_latency_ms)
            .field("news_page_size", &self.news_page_size)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("load_more_threshold", &self.load_more_threshold)
            .field("interleave", &self.interleave)
            .field("shuffle_seed", &self.shuffle_seed)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("default_categories", &self.default_categories)
            .field("dark_mode", &self.dark_mode)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

const KNOWN_KEYS: [&str; 15] = [
    "news_api_key",
    "tmdb_api_key",
    "news_base_url",
    "tmdb_base_url",
    "social_base_url",
    "social_latency_ms",
    "news_page_size",
    "fetch_timeout_secs",
    "load_more_threshold",
    "interleave",
    "shuffle_seed",
    "search_debounce_ms",
    "default_categories",
    "dark_mode",
    "data_dir",
];

impl Config {
    /// Maximum config file size (1 MiB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file yields the defaults.  Unknown keys are logged
    /// and ignored.  Environment overrides are applied separately by
    /// [`Config::apply_env`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_bounded(path, Self::MAX_FILE_SIZE)? else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: toml::Table = content.parse()?;
        for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }

        let config: Config = toml::Value::Table(raw).try_into()?;
        tracing::info!(path = %path.display(), interleave = ?config.interleave, "Loaded configuration");
        Ok(config)
    }

    /// Override API keys from the environment.  Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty(NEWS_API_KEY_ENV) {
            self.news_api_key = Some(key);
        }
        if let Some(key) = non_empty(TMDB_API_KEY_ENV) {
            self.tmdb_api_key = Some(key);
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn social_latency(&self) -> Duration {
        Duration::from_millis(self.social_latency_ms)
    }

    /// Preferences to start from when none were saved.
    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            categories: self.default_categories.clone(),
            dark_mode: self.dark_mode,
            search_query: String::new(),
        }
    }

    /// Configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Read `path` through one handle, rejecting files over `limit` bytes.
/// `Ok(None)` when the file does not exist.
fn read_bounded(path: &Path, limit: u64) -> Result<Option<String>, ConfigError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let size = file.metadata()?.len();
    if size > limit {
        return Err(ConfigError::TooLarge(format!(
            "{} is {size} bytes (max {limit})",
            path.display()
        )));
    }
    let mut content = String::new();
    file.take(limit).read_to_string(&mut content)?;
    Ok(Some(content))
}

/// `~/.config/feedboard/config.toml`, or `./config.toml` if the platform
/// has no config directory.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("feedboard"))
        .unwrap_or_default()
        .join("config.toml")
}

/// `~/.local/share/feedboard` on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("feedboard"))
        .unwrap_or_else(|| PathBuf::from(".feedboard"))
}

// ============================================================================
// Tests
// ============================================================================
