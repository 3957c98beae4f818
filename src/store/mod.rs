//! Durable crawler state
//!
//! A single SQLite database holds the crawler's settings and cursor
//! (key/value rows), its bounded activity log, the player index it builds and
//! the history of crawl runs.

mod index;
mod runs;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::crawler::activity::{CrawlerLogEntry, LOG_CAPACITY};
use crate::error::StoreError;

pub use index::{IndexedPlayer, PlayerSearch};
pub use runs::{CrawlRun, RunOutcome};

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, StoreError>;

/// SQLite-backed crawler state
pub struct StateStore {
    conn: Mutex<Connection>,
}

impl StateStore {
    /// Open or create the store in the default data directory
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::data_dir()?)
    }

    /// Default data directory (~/.local/share/tornboard on Linux)
    pub fn data_dir() -> Result<PathBuf> {
        let base = dirs::data_dir().ok_or(StoreError::NoHome)?;
        Ok(base.join("tornboard"))
    }

    /// Open or create `state.db` inside `dir`
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| StoreError::Io(format!("Failed to create data dir: {}", e)))?;

        let db_path = dir.join("state.db");
        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "State schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| StoreError::Io(format!("Failed to remove state DB: {}", e)))?;
            return Self::open_at(dir);
        }

        Self::init(conn)
    }

    /// In-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS crawler_log (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_id INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                action TEXT NOT NULL,
                details TEXT NOT NULL,
                success INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS player_index (
                id INTEGER PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                level INTEGER NOT NULL,
                status TEXT NOT NULL,
                last_action TEXT NOT NULL,
                company_id INTEGER NOT NULL,
                company_name TEXT NOT NULL,
                faction_id INTEGER NOT NULL,
                faction_name TEXT NOT NULL,
                indexed_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_player_level ON player_index(level);

            CREATE TABLE IF NOT EXISTS crawl_runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at INTEGER NOT NULL,
                finished_at INTEGER,
                processed INTEGER NOT NULL DEFAULT 0,
                indexed INTEGER NOT NULL DEFAULT 0,
                failed INTEGER NOT NULL DEFAULT 0,
                outcome TEXT NOT NULL DEFAULT 'running'
            );
            "#,
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Read a JSON-encoded value
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |r| r.get(0))
            .optional()?;

        raw.map(|s| serde_json::from_str(&s).map_err(|e| StoreError::Encode(format!("{}: {}", key, e))))
            .transpose()
    }

    /// Write a JSON-encoded value
    pub fn put_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded =
            serde_json::to_string(value).map_err(|e| StoreError::Encode(format!("{}: {}", key, e)))?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, encoded],
        )?;
        Ok(())
    }

    /// Append a log entry, keeping only the newest `LOG_CAPACITY` rows
    pub fn append_log(&self, entry: &CrawlerLogEntry) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO crawler_log (entity_id, timestamp, action, details, success)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id as i64,
                entry.timestamp.timestamp_millis(),
                entry.action,
                entry.details,
                entry.success
            ],
        )?;
        conn.execute(
            "DELETE FROM crawler_log WHERE seq NOT IN
             (SELECT seq FROM crawler_log ORDER BY seq DESC LIMIT ?1)",
            [LOG_CAPACITY as i64],
        )?;
        Ok(())
    }

    /// Newest `limit` log entries, oldest first
    pub fn recent_log(&self, limit: usize) -> Result<Vec<CrawlerLogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entity_id, timestamp, action, details, success FROM crawler_log
             ORDER BY seq DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(CrawlerLogEntry {
                id: row.get::<_, i64>(0)? as u64,
                timestamp: chrono::DateTime::from_timestamp_millis(row.get(1)?).unwrap_or_default(),
                action: row.get(2)?,
                details: row.get(3)?,
                success: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        entries.reverse();
        Ok(entries)
    }

    /// Drop the kv table so writes fail (for testing systemic failures)
    #[cfg(test)]
    pub(crate) fn break_for_test(&self) {
        if let Ok(conn) = self.conn() {
            let _ = conn.execute_batch("DROP TABLE kv;");
        }
    }
}
