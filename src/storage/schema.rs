//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Kensaku database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawled page
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    site TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    crawled_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_site ON documents(site);

-- Inverted index: one row per (document, normalized word)
CREATE TABLE IF NOT EXISTS indexes (
    id TEXT PRIMARY KEY,
    doc_id TEXT NOT NULL REFERENCES documents(id),
    word TEXT NOT NULL,
    count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_indexes_word ON indexes(word);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
