//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The per-job URL queue and the registry of jobs
//! - HTTP fetching with a capped body
//! - HTML parsing and link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod registry;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, Fetcher};
pub use frontier::{Queue, QueueSnapshot};
pub use parser::{
    extract_links, extract_text, extract_title, new_document, parse_page, ParsedPage,
    UNWANTED_TAGS,
};
pub use registry::QueueRegistry;
