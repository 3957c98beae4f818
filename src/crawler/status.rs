//! Crawler status snapshots

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::activity::CrawlerLogEntry;
use super::config::CrawlerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Error,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerStatus {
    pub state: RunState,
    /// Next id to scan
    pub current_position: u64,
    /// Players indexed since the store was created
    pub indexed_count: u64,
    /// Size of the configured range
    pub total_count: u64,
    /// Ids per minute over the last batch
    pub crawl_speed: f64,
    pub next_run: Option<DateTime<Utc>>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl CrawlerStatus {
    pub fn idle(config: &CrawlerConfig) -> Self {
        Self {
            state: RunState::Idle,
            current_position: config.range_start,
            indexed_count: 0,
            total_count: config.range_len(),
            crawl_speed: 0.0,
            next_run: None,
            last_run: None,
            last_error: None,
        }
    }
}

/// Status plus progress and time estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedStatus {
    #[serde(flatten)]
    pub status: CrawlerStatus,
    pub config: CrawlerConfig,
    /// Ids left before the range end
    pub remaining: u64,
    pub progress_percent: f64,
    pub eta_minutes: Option<f64>,
    pub estimated_completion: Option<DateTime<Utc>>,
    /// Distinct players in the index
    pub distinct_players: usize,
    pub recent_log: Vec<CrawlerLogEntry>,
}

impl DetailedStatus {
    /// Derive progress figures as of `now`.
    pub fn derive(
        status: CrawlerStatus,
        config: CrawlerConfig,
        distinct_players: usize,
        recent_log: Vec<CrawlerLogEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining = if config.contains(status.current_position) {
            config.range_end - status.current_position + 1
        } else {
            0
        };
        let total = config.range_len();
        let progress_percent = (total - remaining.min(total)) as f64 * 100.0 / total as f64;

        let eta_minutes = (status.crawl_speed > 0.0).then(|| remaining as f64 / status.crawl_speed);
        let estimated_completion = eta_minutes
            .and_then(|m| TimeDelta::try_seconds((m * 60.0) as i64))
            .map(|d| now + d);

        Self {
            status,
            config,
            remaining,
            progress_percent,
            eta_minutes,
            estimated_completion,
            distinct_players,
            recent_log,
        }
    }
}
