//! Kensaku: a focused web crawler with an inverted word index
//!
//! This crate crawls a single seed site, extracts page text and links,
//! builds a per-document word index and serves ranked keyword search over
//! everything it has indexed.

pub mod api;
pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod search;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Kensaku operations
#[derive(Debug, Error)]
pub enum KensakuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Url was invalid: {0}")]
    InvalidUrl(String),

    #[error("Url did not return a 200 OK response: {url} (HTTP {status})")]
    UnreachableUrl { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Can't dequeue from an empty queue")]
    EmptyQueue,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::JobState,
        to: state::JobState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Kensaku operations
pub type Result<T> = std::result::Result<T, KensakuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Queue, QueueRegistry};
pub use search::{search, SearchResults};
pub use state::{JobState, QueueStatus};
pub use storage::{Document, IndexEntry, SqliteStorage, Storage};
