//! Kensaku main entry point
//!
//! This is the command-line interface for the Kensaku crawler and search engine.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kensaku::api::{self, ApiState};
use kensaku::config::{load_config_or_default, Config};
use kensaku::crawler::{Crawler, Queue, QueueRegistry};
use kensaku::output::{load_statistics, print_statistics};
use kensaku::search::search;
use kensaku::storage::SqliteStorage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Kensaku: a focused web crawler with keyword search
///
/// Kensaku crawls one site at a time, indexes the words on every page it
/// reaches and answers ranked keyword queries over everything indexed.
#[derive(Parser, Debug)]
#[command(name = "kensaku")]
#[command(version)]
#[command(about = "A focused web crawler with keyword search", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used if it does not exist)
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve,

    /// Crawl a site starting at URL and wait until it is fully indexed
    Crawl {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Search the index
    Search {
        /// Query words
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show statistics from the database and exit
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Command::Serve => handle_serve(config).await,
        Command::Crawl { url } => handle_crawl(config, &url).await,
        Command::Search { query } => handle_search(&config, &query.join(" ")),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kensaku=info,warn"),
            1 => EnvFilter::new("kensaku=debug,tower_http=debug,info"),
            2 => EnvFilter::new("kensaku=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.storage.database_path);
    SqliteStorage::new(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles `serve`: runs the JSON API until interrupted
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let storage = Arc::new(Mutex::new(open_storage(&config)?));
    let crawler = Crawler::from_config(&config, storage)?;
    let state = ApiState::new(crawler, Arc::new(QueueRegistry::new()));

    api::serve(&config.api.bind_address(), state).await?;
    Ok(())
}

/// Handles `crawl`: indexes the seed, then waits for the rest of the site
async fn handle_crawl(config: Config, url: &str) -> anyhow::Result<()> {
    let storage = Arc::new(Mutex::new(open_storage(&config)?));
    let crawler = Crawler::from_config(&config, storage)?;
    let queue = Arc::new(Queue::new(url));

    let handle = crawler
        .crawl(url, Arc::clone(&queue))
        .await
        .with_context(|| format!("Crawling {} failed", url))?;

    tracing::info!(
        "Seed indexed, {} links queued (politeness delay {}ms)",
        queue.len(),
        config.crawler.politeness_delay
    );

    handle.await.context("Crawl task panicked")?;

    println!(
        "Crawl of {} finished: {} URLs seen",
        url,
        queue.seen_count()
    );
    Ok(())
}

/// Handles `search`: prints one line per matching row
fn handle_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let results = search(&storage, query)?;

    println!("{} ({})\n", results.render_count(), results.render_speed());
    for result in &results.results {
        println!(
            "{:>4}  {}  {}",
            result.index.count,
            result.document.url,
            if result.document.title.is_empty() {
                "(untitled)"
            } else {
                &result.document.title
            }
        );
    }

    Ok(())
}

/// Handles `stats`: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(config)?;
    let stats = load_statistics(&storage)?;

    print_statistics(&stats);

    Ok(())
}
