//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{Document, IndexEntry};
use crate::KensakuError;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(KensakuError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, KensakuError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    ///
    /// Used by tests and by one-off commands that do not need persistence.
    pub fn open_in_memory() -> Result<Self, KensakuError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
        self.conn.execute_batch(sql)
    }
}

fn document_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(offset)?,
        url: row.get(offset + 1)?,
        site: row.get(offset + 2)?,
        title: row.get(offset + 3)?,
        content: row.get(offset + 4)?,
        crawled_at: row.get(offset + 5)?,
    })
}

fn index_entry_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<IndexEntry> {
    Ok(IndexEntry {
        id: row.get(offset)?,
        doc_id: row.get(offset + 1)?,
        word: row.get(offset + 2)?,
        count: row.get(offset + 3)?,
    })
}

fn count(conn: &Connection, query: &str) -> StorageResult<u64> {
    let n: i64 = conn.query_row(query, [], |row| row.get(0))?;
    Ok(n as u64)
}

impl Storage for SqliteStorage {
    // ===== Documents =====

    fn put_document(&mut self, document: &Document) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO documents (id, url, site, title, content, crawled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                document.id,
                document.url,
                document.site,
                document.title,
                document.content,
                document.crawled_at
            ],
        )?;
        Ok(())
    }

    fn get_document(&self, id: &str) -> StorageResult<Document> {
        self.conn
            .query_row(
                "SELECT id, url, site, title, content, crawled_at FROM documents WHERE id = ?1",
                params![id],
                |row| document_from_row(row, 0),
            )
            .optional()?
            .ok_or_else(|| StorageError::DocumentNotFound(id.to_string()))
    }

    // ===== Index =====

    fn put_index_entries(&mut self, entries: &[IndexEntry]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO indexes (id, doc_id, word, count) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                stmt.execute(params![entry.id, entry.doc_id, entry.word, entry.count])?;
            }
        }
        // Dropping an uncommitted transaction rolls it back, so an early
        // return above leaves no partial batch behind.
        tx.commit()?;
        Ok(())
    }

    fn query_index_join_documents(
        &self,
        keywords: &[String],
    ) -> StorageResult<Vec<(Document, IndexEntry)>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; keywords.len()].join(", ");
        let query = format!(
            "SELECT d.id, d.url, d.site, d.title, d.content, d.crawled_at,
                    i.id, i.doc_id, i.word, i.count
             FROM indexes i
             JOIN documents d ON d.id = i.doc_id
             WHERE i.word IN ({})
             ORDER BY i.count DESC, i.id ASC",
            placeholders
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt
            .query_map(params_from_iter(keywords.iter()), |row| {
                Ok((document_from_row(row, 0)?, index_entry_from_row(row, 6)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM documents")
    }

    fn count_index_entries(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM indexes")
    }

    fn count_distinct_words(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(DISTINCT word) FROM indexes")
    }

    fn documents_per_site(&self) -> StorageResult<Vec<(String, u64)>> {
        let query = "
            SELECT site, COUNT(*) as count
            FROM documents
            GROUP BY site
            ORDER BY site
        ";

        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut sites = Vec::new();
        for row in rows {
            sites.push(row?);
        }

        Ok(sites)
    }
}
