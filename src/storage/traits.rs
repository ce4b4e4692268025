//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{Document, IndexEntry};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(msg.unwrap_or_else(|| e.to_string()))
            }
            other => Self::Sqlite(other),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all persistence operations needed by the crawler and
/// the search engine. Callers share one instance behind a mutex.
pub trait Storage {
    // ===== Documents =====

    /// Persists a document
    ///
    /// # Errors
    ///
    /// `StorageError::ConstraintViolation` if a document with the same id exists.
    fn put_document(&mut self, document: &Document) -> StorageResult<()>;

    /// Gets a document by id
    fn get_document(&self, id: &str) -> StorageResult<Document>;

    // ===== Index =====

    /// Persists the index entries of one document as a single batch
    ///
    /// Either every entry is written or none is; a duplicate id anywhere in
    /// the batch fails the whole call.
    fn put_index_entries(&mut self, entries: &[IndexEntry]) -> StorageResult<()>;

    /// Looks up every index entry whose word is one of `keywords` and joins
    /// it with its owning document
    ///
    /// # Returns
    ///
    /// One row per matching entry, ordered by count descending and then by
    /// index id so that equal counts come back in a stable order.
    fn query_index_join_documents(
        &self,
        keywords: &[String],
    ) -> StorageResult<Vec<(Document, IndexEntry)>>;

    // ===== Statistics =====

    /// Gets total document count
    fn count_documents(&self) -> StorageResult<u64>;

    /// Gets total index entry count
    fn count_index_entries(&self) -> StorageResult<u64>;

    /// Gets count of distinct indexed words
    fn count_distinct_words(&self) -> StorageResult<u64>;

    /// Gets document count per site, sorted by site
    fn documents_per_site(&self) -> StorageResult<Vec<(String, u64)>>;
}
