//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::Storage;
use crate::KensakuError;
use std::fmt::Write;

/// Index statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStatistics {
    /// Total number of stored documents
    pub total_documents: u64,

    /// Total number of (document, word) index entries
    pub total_index_entries: u64,

    /// Number of distinct normalized words
    pub distinct_words: u64,

    /// Documents stored per site, sorted by site
    pub documents_per_site: Vec<(String, u64)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(KensakuError)` - Failed to query statistics
pub fn load_statistics<S: Storage + ?Sized>(storage: &S) -> Result<IndexStatistics, KensakuError> {
    Ok(IndexStatistics {
        total_documents: storage.count_documents()?,
        total_index_entries: storage.count_index_entries()?,
        distinct_words: storage.count_distinct_words()?,
        documents_per_site: storage.documents_per_site()?,
    })
}

/// Renders statistics as the text shown by the `stats` command
pub fn format_statistics(stats: &IndexStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== Index Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Documents: {}", stats.total_documents);
    let _ = writeln!(out, "  Index entries: {}", stats.total_index_entries);
    let _ = writeln!(out, "  Distinct words: {}", stats.distinct_words);

    let average = if stats.total_documents > 0 {
        stats.total_index_entries as f64 / stats.total_documents as f64
    } else {
        0.0
    };
    let _ = writeln!(out, "  Words per document: {:.1}", average);

    if !stats.documents_per_site.is_empty() {
        let _ = writeln!(out, "\nDocuments by Site ({}):", stats.documents_per_site.len());
        for (site, count) in &stats.documents_per_site {
            let _ = writeln!(out, "  {}: {}", site, count);
        }
    }

    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IndexStatistics) {
    print!("{}", format_statistics(stats));
}
