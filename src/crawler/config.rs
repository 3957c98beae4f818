//! Crawler settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CrawlerError;

/// Crawler settings, persisted in the state store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub enabled: bool,
    pub interval_minutes: u32,
    /// First id of the scanned range (inclusive)
    pub range_start: u64,
    /// Last id of the scanned range (inclusive)
    pub range_end: u64,
    /// Pause between units of work
    pub request_delay_ms: u64,
    /// Ids per batch
    pub batch_size: u32,
    /// Consecutive ids processed together.
    ///
    /// The cursor is saved once the whole group has finished, so a crash
    /// mid-group repeats up to this many ids. At 1 it loses at most one.
    pub max_concurrency: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: 60,
            range_start: 1,
            range_end: 3_000_000,
            request_delay_ms: 700,
            batch_size: 100,
            max_concurrency: 1,
        }
    }
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<(), CrawlerError> {
        if self.range_start == 0 {
            return Err(CrawlerError::InvalidConfig(
                "range start must be at least 1".to_string(),
            ));
        }
        if self.range_start > self.range_end {
            return Err(CrawlerError::InvalidConfig(format!(
                "range start {} is after range end {}",
                self.range_start, self.range_end
            )));
        }
        if self.interval_minutes == 0 {
            return Err(CrawlerError::InvalidConfig(
                "interval must be at least 1 minute".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(CrawlerError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(CrawlerError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of ids in the range
    pub fn range_len(&self) -> u64 {
        self.range_end.saturating_sub(self.range_start) + 1
    }

    pub fn contains(&self, id: u64) -> bool {
        (self.range_start..=self.range_end).contains(&id)
    }

    /// Position after `id`, wrapping to the range start. The flag is true on
    /// wrap.
    pub fn next_position(&self, id: u64) -> (u64, bool) {
        if id >= self.range_end {
            (self.range_start, true)
        } else {
            (id + 1, false)
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Apply a partial update
    pub fn merged(&self, update: &CrawlerConfigUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            interval_minutes: update.interval_minutes.unwrap_or(self.interval_minutes),
            range_start: update.range_start.unwrap_or(self.range_start),
            range_end: update.range_end.unwrap_or(self.range_end),
            request_delay_ms: update.request_delay_ms.unwrap_or(self.request_delay_ms),
            batch_size: update.batch_size.unwrap_or(self.batch_size),
            max_concurrency: update.max_concurrency.unwrap_or(self.max_concurrency),
        }
    }
}

/// Partial settings change; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlerConfigUpdate {
    pub enabled: Option<bool>,
    pub interval_minutes: Option<u32>,
    pub range_start: Option<u64>,
    pub range_end: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub batch_size: Option<u32>,
    pub max_concurrency: Option<u32>,
}

impl CrawlerConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
