//! Storage module for persisting crawled documents and their word index
//!
//! This module handles all database operations for Kensaku, including:
//! - SQLite database initialization and schema management
//! - Document persistence
//! - Batched index entry persistence
//! - The keyword lookup joined against documents that backs search

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::KensakuError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(KensakuError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, KensakuError> {
    SqliteStorage::new(path)
}

/// A fetched and parsed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub url: String,
    pub site: String,
    pub title: String,
    pub content: String,
    pub crawled_at: String,
}

impl Document {
    /// Creates a document with a fresh random id, stamped with the current time
    pub fn new(
        url: impl Into<String>,
        site: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            site: site.into(),
            title: title.into(),
            content: content.into(),
            crawled_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Occurrence count of one normalized word within one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub doc_id: String,
    pub word: String,
    pub count: i64,
}

impl IndexEntry {
    pub fn new(doc_id: impl Into<String>, word: impl Into<String>, count: i64) -> Self {
        let doc_id = doc_id.into();
        let word = word.into();
        Self {
            id: index_id(&doc_id, &word),
            doc_id,
            word,
            count,
        }
    }
}

/// Derives the id of an index entry from its document and word
///
/// The same pair always maps to the same id, so indexing a document twice
/// collides on the primary key instead of duplicating rows.
pub fn index_id(doc_id: &str, word: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(doc_id.as_bytes());
    hasher.update(b"::");
    hasher.update(word.as_bytes());
    hex::encode(hasher.finalize())
}
