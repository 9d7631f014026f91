//! Binary entry point: parse arguments, load config, wire sources and
//! storage into a [`Dashboard`], then run the terminal event loop.
//!
//! Logs go to a file (default `feedboard.log` in the data directory) so they
//! never draw over the TUI.  Set `RUST_LOG=feedboard=debug` for more detail.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use feedboard::app::App;
use feedboard::config::{self, Config};
use feedboard::dashboard::Dashboard;
use feedboard::fetch::{self, FetchMsg};
use feedboard::input;
use feedboard::merger::{FeedMerger, Interleave};
use feedboard::source::{HttpSocialSource, MockSocialSource, NewsApiSource, Sources, TmdbSource};
use feedboard::storage::{FileStore, KeyValueStore, MemoryStore};
use feedboard::trigger::LoadMoreTrigger;
use feedboard::ui;

#[derive(Parser, Debug)]
#[command(name = "feedboard", about = "News, movies and social posts in one terminal feed")]
struct Args {
    /// Config file (default: ~/.config/feedboard/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed the feed shuffle for a reproducible order
    #[arg(long)]
    seed: Option<u64>,

    /// Interleave sources one item at a time instead of shuffling
    #[arg(long)]
    round_robin: bool,

    /// Log file (default: feedboard.log in the data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Keep favorites and preferences in memory only
    #[arg(long)]
    ephemeral: bool,
}

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_sources(config: &Config) -> Result<Sources> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("feedboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    if config.news_api_key.is_none() {
        tracing::warn!("No news API key configured; news fetches will fail");
    }
    if config.tmdb_api_key.is_none() {
        tracing::warn!("No TMDB API key configured; movie fetches will fail");
    }

    let social: Arc<dyn feedboard::source::DataSource> = match &config.social_base_url {
        Some(url) => Arc::new(HttpSocialSource::new(client.clone(), url.clone())),
        None => Arc::new(MockSocialSource::with_latency(config.social_latency())),
    };

    Ok(Sources {
        news: Arc::new(
            NewsApiSource::new(
                client.clone(),
                config.news_base_url.clone(),
                config.news_api_key.clone(),
            )
            .with_page_size(config.news_page_size),
        ),
        movies: Arc::new(TmdbSource::new(
            client,
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
        )),
        social,
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -- configuration and logging -------------------------------------------
    let config_path = args.config.clone().unwrap_or_else(config::default_path);
    let mut config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    config.apply_env(|name| std::env::var(name).ok());
    if args.round_robin {
        config.interleave = Interleave::RoundRobin;
    }
    if args.seed.is_some() {
        config.shuffle_seed = args.seed;
    }

    let data_dir = config.data_dir();
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("feedboard.log"));
    init_logging(&log_path)?;
    tracing::info!(?config, "Starting feedboard");

    // -- sources, storage, dashboard -----------------------------------------
    let sources = build_sources(&config)?;
    let storage: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(&data_dir)?)
    };
    let merger = FeedMerger::new(config.interleave, config.shuffle_seed);
    let mut dashboard = Dashboard::new(
        sources.clone(),
        storage,
        config.default_preferences(),
        merger,
    );
    dashboard.refresh();

    let mut app = App::new(
        dashboard,
        LoadMoreTrigger::new(config.load_more_threshold),
        config.search_debounce(),
    );
    let fetch_timeout = config.fetch_timeout();
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchMsg>();

    // -- terminal setup (RAII; Drop restores on exit or panic) ---------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Each iteration renders, lets the sentinel ask for more, starts any
    // queued page fetch, then waits on whichever comes first: a key, a
    // finished page, or the 100 ms tick that commits a debounced search.
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    while !app.quit {
        app.clamp_selection();
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;
        if app.check_load_more() {
            app.status = "Loading more…".into();
        }

        if let Some(request) = app.dashboard.take_request() {
            tracing::debug!(
                generation = request.generation,
                fetches = request.fetches.len(),
                "Dispatching page"
            );
            fetch::spawn_page(sources.clone(), request, fetch_timeout, tx.clone());
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => input::handle_key_event(&mut app, key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("reading terminal input"),
                None => break,
            },
            Some(msg) = rx.recv() => app.apply_page(msg),
            _ = tick.tick() => app.tick(Instant::now()),
        }
    }

    tracing::info!("Exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
