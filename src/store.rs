use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Result, TenCentsError};
use crate::models::Transaction;

pub const DB_FILE: &str = "tencents.db";

/// Key the saved dataset lives under.
pub const EXPENSES_KEY: &str = "expenses";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    checksum TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    date_range_start TEXT,
    date_range_end TEXT,
    imported_at TEXT DEFAULT (datetime('now'))
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open (creating if needed) the store inside a data directory.
pub fn open(data_dir: &Path) -> Result<Connection> {
    let conn = get_connection(&data_dir.join(DB_FILE))?;
    init_db(&conn)?;
    Ok(conn)
}

// ---------------------------------------------------------------------------
// Key-value access
// ---------------------------------------------------------------------------

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |r| r.get(0))
        .optional()?)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

pub fn delete_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Saved transactions
// ---------------------------------------------------------------------------

pub fn serialize_transactions(txns: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string(txns)?)
}

pub fn deserialize_transactions(text: &str) -> Result<Vec<Transaction>> {
    Ok(serde_json::from_str(text)?)
}

pub fn save_transactions(conn: &Connection, txns: &[Transaction]) -> Result<()> {
    set_value(conn, EXPENSES_KEY, &serialize_transactions(txns)?)?;
    info!(count = txns.len(), "saved transactions");
    Ok(())
}

/// The saved set, or an empty one when nothing has been saved.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    match get_value(conn, EXPENSES_KEY)? {
        Some(text) => deserialize_transactions(&text),
        None => Ok(Vec::new()),
    }
}

pub fn clear_transactions(conn: &Connection) -> Result<()> {
    delete_value(conn, EXPENSES_KEY)
}

/// Remove the saved transaction at `index` and return it.
pub fn remove_at(conn: &Connection, index: usize) -> Result<Transaction> {
    let mut txns = load_transactions(conn)?;
    if index >= txns.len() {
        return Err(TenCentsError::Other(format!(
            "No saved transaction at index {index} ({} saved)",
            txns.len()
        )));
    }
    let removed = txns.remove(index);
    save_transactions(conn, &txns)?;
    Ok(removed)
}

/// Positions and transactions whose name or note contains `term`,
/// ignoring case. An empty term matches everything.
pub fn search_transactions<'a>(txns: &'a [Transaction], term: &str) -> Vec<(usize, &'a Transaction)> {
    let term = term.trim().to_lowercase();
    txns.iter()
        .enumerate()
        .filter(|(_, t)| {
            term.is_empty()
                || t.name.to_lowercase().contains(&term)
                || t.note.to_lowercase().contains(&term)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Import history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub filename: String,
    pub checksum: String,
    pub record_count: i64,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
    pub imported_at: String,
}

pub fn record_import(
    conn: &Connection,
    filename: &str,
    checksum: &str,
    record_count: usize,
    span: Option<(String, String)>,
) -> Result<()> {
    let (start, end) = span.unzip();
    conn.execute(
        "INSERT INTO imports (filename, checksum, record_count, date_range_start, date_range_end) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![filename, checksum, record_count as i64, start, end],
    )?;
    Ok(())
}

pub fn last_import(conn: &Connection) -> Result<Option<ImportRecord>> {
    Ok(conn
        .query_row(
            "SELECT filename, checksum, record_count, date_range_start, date_range_end, imported_at \
             FROM imports ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                Ok(ImportRecord {
                    filename: row.get(0)?,
                    checksum: row.get(1)?,
                    record_count: row.get(2)?,
                    date_range_start: row.get(3)?,
                    date_range_end: row.get(4)?,
                    imported_at: row.get(5)?,
                })
            },
        )
        .optional()?)
}
