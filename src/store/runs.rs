//! Crawl run history

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{Result, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Running,
    Completed,
    Paused,
    Failed,
}

impl RunOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Running => "running",
            RunOutcome::Completed => "completed",
            RunOutcome::Paused => "paused",
            RunOutcome::Failed => "failed",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "completed" => RunOutcome::Completed,
            "paused" => RunOutcome::Paused,
            "failed" => RunOutcome::Failed,
            _ => RunOutcome::Running,
        }
    }
}

/// One crawler cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRun {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub processed: u64,
    pub indexed: u64,
    pub failed: u64,
    pub outcome: RunOutcome,
}

impl StateStore {
    /// Record the start of a run, returning its id
    pub fn start_run(&self, started_at: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO crawl_runs (started_at) VALUES (?1)",
            [started_at.timestamp()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn finish_run(
        &self,
        id: i64,
        finished_at: DateTime<Utc>,
        counts: (u64, u64, u64),
        outcome: RunOutcome,
    ) -> Result<()> {
        let (processed, indexed, failed) = counts;
        self.conn()?.execute(
            "UPDATE crawl_runs SET finished_at = ?2, processed = ?3, indexed = ?4, failed = ?5, outcome = ?6
             WHERE id = ?1",
            params![
                id,
                finished_at.timestamp(),
                processed as i64,
                indexed as i64,
                failed as i64,
                outcome.as_str()
            ],
        )?;
        Ok(())
    }

    /// Newest runs first
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<CrawlRun>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, started_at, finished_at, processed, indexed, failed, outcome
             FROM crawl_runs ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            let finished: Option<i64> = row.get(2)?;
            let outcome: String = row.get(6)?;
            Ok(CrawlRun {
                id: row.get(0)?,
                started_at: DateTime::from_timestamp(row.get(1)?, 0).unwrap_or_default(),
                finished_at: finished.and_then(|t| DateTime::from_timestamp(t, 0)),
                processed: row.get::<_, i64>(3)? as u64,
                indexed: row.get::<_, i64>(4)? as u64,
                failed: row.get::<_, i64>(5)? as u64,
                outcome: RunOutcome::parse(&outcome),
            })
        })?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(row?);
        }
        Ok(runs)
    }
}
