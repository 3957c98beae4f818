//! Crawler and cache display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_time, truncate_string};
use crate::cache::storage::SnapshotStats;
use crate::crawler::CrawlerLogEntry;
use crate::store::{CrawlRun, IndexedPlayer};

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CrawlLogDisplay {
    #[tabled(rename = "TIME")]
    pub time: String,

    #[tabled(rename = "ACTION")]
    pub action: String,

    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "OK")]
    pub ok: String,

    #[tabled(rename = "DETAILS")]
    pub details: String,
}

impl From<&CrawlerLogEntry> for CrawlLogDisplay {
    fn from(e: &CrawlerLogEntry) -> Self {
        Self {
            time: format_time(Some(e.timestamp)),
            action: e.action.clone(),
            id: if e.id == 0 { "-".to_string() } else { e.id.to_string() },
            ok: if e.success { "\u{2713}" } else { "\u{2717}" }.to_string(),
            details: truncate_string(&e.details, 60),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct IndexedPlayerDisplay {
    #[tabled(rename = "ID")]
    pub id: u64,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "LVL")]
    pub level: u32,

    #[tabled(rename = "COMPANY")]
    pub company: String,

    #[tabled(rename = "FACTION")]
    pub faction: String,

    #[tabled(rename = "LAST ACTION")]
    pub last_action: String,

    #[tabled(rename = "INDEXED")]
    pub indexed_at: String,
}

impl From<&IndexedPlayer> for IndexedPlayerDisplay {
    fn from(p: &IndexedPlayer) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            level: p.level,
            company: truncate_string(&p.company_name, 24),
            faction: truncate_string(&p.faction_name, 24),
            last_action: p.last_action.clone(),
            indexed_at: format_time(Some(p.indexed_at)),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CrawlRunDisplay {
    #[tabled(rename = "RUN")]
    pub id: i64,

    #[tabled(rename = "STARTED")]
    pub started: String,

    #[tabled(rename = "FINISHED")]
    pub finished: String,

    #[tabled(rename = "PROCESSED")]
    pub processed: u64,

    #[tabled(rename = "INDEXED")]
    pub indexed: u64,

    #[tabled(rename = "FAILED")]
    pub failed: u64,

    #[tabled(rename = "OUTCOME")]
    pub outcome: String,
}

impl From<&CrawlRun> for CrawlRunDisplay {
    fn from(r: &CrawlRun) -> Self {
        Self {
            id: r.id,
            started: format_time(Some(r.started_at)),
            finished: format_time(r.finished_at),
            processed: r.processed,
            indexed: r.indexed,
            failed: r.failed,
            outcome: format!("{:?}", r.outcome).to_lowercase(),
        }
    }
}

/// One reference cache snapshot on disk
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CacheDisplay {
    #[tabled(rename = "CACHE")]
    pub name: String,

    #[tabled(rename = "ENTRIES")]
    pub entries: usize,

    #[tabled(rename = "UPDATED")]
    pub updated: String,

    #[tabled(rename = "FRESH")]
    pub fresh: String,

    #[tabled(rename = "SIZE")]
    pub size_bytes: usize,
}

impl CacheDisplay {
    pub fn new(stats: &SnapshotStats, fresh: bool) -> Self {
        Self {
            name: stats.name.clone(),
            entries: stats.entries,
            updated: format_time(Some(stats.updated_at)),
            fresh: if fresh { "\u{2713}" } else { "" }.to_string(),
            size_bytes: stats.size_bytes,
        }
    }
}
