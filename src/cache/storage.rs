//! SQLite-based snapshot storage for the reference caches
//!
//! One row per cache: the serialized mapping plus the time it was fetched.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, StoreError>;

/// A persisted cache snapshot
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub data: String,
    pub entries: usize,
    pub updated_at: DateTime<Utc>,
}

/// SQLite-backed snapshot storage
pub struct SnapshotStorage {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SnapshotStorage {
    /// Open or create storage at the default cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/tornboard on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(StoreError::NoHome)?;
        Ok(cache_base.join("tornboard"))
    }

    /// Open storage in a specific directory (for testing)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| StoreError::Io(format!("Failed to remove cache DB: {}", e)))?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS reference_snapshots (
                name TEXT PRIMARY KEY NOT NULL,
                data TEXT NOT NULL,
                entries INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: db_path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Load the snapshot stored under `name`
    pub fn load(&self, name: &str) -> Result<Option<StoredSnapshot>> {
        let row: Option<(String, i64, i64)> = self
            .conn()?
            .query_row(
                "SELECT data, entries, updated_at FROM reference_snapshots WHERE name = ?1",
                [name],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        Ok(row.map(|(data, entries, updated_at)| StoredSnapshot {
            data,
            entries: entries as usize,
            updated_at: DateTime::from_timestamp(updated_at, 0).unwrap_or_default(),
        }))
    }

    /// Replace the snapshot stored under `name`
    pub fn save(&self, name: &str, data: &str, entries: usize, updated_at: DateTime<Utc>) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO reference_snapshots (name, data, entries, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, data, entries as i64, updated_at.timestamp()],
        )?;
        Ok(())
    }

    /// Clear all snapshots
    pub fn clear_all(&self) -> Result<ClearStats> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM reference_snapshots", [], |r| r.get(0))?;
        conn.execute("DELETE FROM reference_snapshots", [])?;

        Ok(ClearStats {
            entries_removed: count as usize,
        })
    }

    /// Per-snapshot summary
    pub fn stats(&self) -> Result<Vec<SnapshotStats>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, entries, updated_at, LENGTH(data) FROM reference_snapshots ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SnapshotStats {
                name: row.get(0)?,
                entries: row.get::<_, i64>(1)? as usize,
                updated_at: DateTime::from_timestamp(row.get(2)?, 0).unwrap_or_default(),
                size_bytes: row.get::<_, i64>(3)? as usize,
            })
        })?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Summary of one stored snapshot
#[derive(Debug, Clone)]
pub struct SnapshotStats {
    pub name: String,
    pub entries: usize,
    pub updated_at: DateTime<Utc>,
    pub size_bytes: usize,
}
