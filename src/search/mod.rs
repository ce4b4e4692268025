//! Keyword search over the word index
//!
//! A query is split on whitespace and each token goes through the same
//! normalization as indexed text. Matching index entries are joined with
//! their documents and ranked by occurrence count.

use crate::index::normalize;
use crate::storage::{Document, IndexEntry, Storage};
use crate::KensakuError;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

/// One matching word of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub document: Document,
    pub index: IndexEntry,
}

/// Ranked rows for one query, with timing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Seconds spent answering the query
    pub speed: f64,
    /// Number of rows returned
    pub count: usize,
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    /// Formats the elapsed time, e.g. `0.0012 seconds`
    pub fn render_speed(&self) -> String {
        format!("{:.4} seconds", self.speed)
    }

    /// Formats the result count, e.g. `Showing 3 of 3 results.`
    pub fn render_count(&self) -> String {
        format!("Showing {} of {} results.", self.results.len(), self.count)
    }
}

/// Splits a query into distinct normalized keywords, in first-seen order
///
/// # Examples
///
/// ```
/// use kensaku::search::parse_query;
///
/// assert_eq!(parse_query("The Crawling crawler, crawled"), vec!["crawl", "crawler"]);
/// assert!(parse_query("the and of").is_empty());
/// ```
pub fn parse_query(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split_whitespace()
        .filter_map(normalize)
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

/// Runs a query against `storage`
///
/// A query without usable keywords yields an empty result set without
/// touching the store.
///
/// # Errors
///
/// `KensakuError::Storage` if the lookup fails; no partial results are
/// returned.
pub fn search<S: Storage + ?Sized>(storage: &S, query: &str) -> Result<SearchResults, KensakuError> {
    let start = Instant::now();

    let keywords = parse_query(query);
    let rows = storage.query_index_join_documents(&keywords)?;

    let results: Vec<SearchResult> = rows
        .into_iter()
        .map(|(document, index)| SearchResult { document, index })
        .collect();

    tracing::debug!(
        "Query {:?} -> keywords {:?}, {} rows",
        query,
        keywords,
        results.len()
    );

    Ok(SearchResults {
        speed: start.elapsed().as_secs_f64(),
        count: results.len(),
        results,
    })
}
