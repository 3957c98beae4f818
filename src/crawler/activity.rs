//! Bounded crawler activity log

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept in memory and on disk
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerLogEntry {
    /// Scanned id, or 0 for lifecycle events
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    /// "start", "index", "skip", "fail", "wrap", "finish", "pause", "config", "error"
    pub action: String,
    pub details: String,
    pub success: bool,
}

impl CrawlerLogEntry {
    pub fn new(id: u64, action: &str, details: impl Into<String>, success: bool) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            action: action.to_string(),
            details: details.into(),
            success,
        }
    }
}

/// Ring of the most recent entries
#[derive(Debug, Default)]
pub struct CrawlLog {
    entries: VecDeque<CrawlerLogEntry>,
}

impl CrawlLog {
    /// Seed from persisted entries, oldest first.
    pub fn from_entries(entries: Vec<CrawlerLogEntry>) -> Self {
        let mut log = Self::default();
        for entry in entries {
            log.push(entry);
        }
        log
    }

    pub fn push(&mut self, entry: CrawlerLogEntry) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn newest_first(&self) -> Vec<CrawlerLogEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
