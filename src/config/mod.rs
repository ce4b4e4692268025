//! Configuration module for Kensaku
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error: every section has defaults.
//!
//! # Example
//!
//! ```no_run
//! use kensaku::config::load_config_or_default;
//! use std::path::Path;
//!
//! let config = load_config_or_default(Path::new("config.toml")).unwrap();
//! println!("Serving on {}", config.api.bind_address());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, CrawlerConfig, StorageConfig, UserAgentConfig, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_POLITENESS_DELAY_MS,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
