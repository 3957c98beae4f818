//! Resumable id-range crawler
//!
//! The crawler walks a configured id range in bounded batches, handing each
//! id to a [`UnitWorker`]. Its cursor is persisted after every unit, so a
//! restart resumes where the last process stopped. When enabled, a finished
//! batch schedules the next one after the configured interval.
//!
//! States: `idle -> running -> idle`, `running -> error` on a systemic
//! failure (the next run is still scheduled), and `paused` after an explicit
//! [`Crawler::pause`] until [`Crawler::start`].

pub mod activity;
pub mod config;
pub mod schedule;
pub mod status;
pub mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::Notify;

use crate::error::{CrawlerError, Result};
use crate::store::{RunOutcome, StateStore};

pub use activity::{CrawlLog, CrawlerLogEntry, LOG_CAPACITY};
pub use config::{CrawlerConfig, CrawlerConfigUpdate};
pub use schedule::{ScheduledRun, next_delay};
pub use status::{CrawlerStatus, DetailedStatus, RunState};
pub use worker::{PlayerIndexer, UnitOutcome, UnitWorker};

const KEY_CONFIG: &str = "crawler.config";
const KEY_CURSOR: &str = "crawler.cursor";
const KEY_LAST_RUN: &str = "crawler.last_run";
const KEY_INDEXED: &str = "crawler.indexed_count";

/// Delay before a run triggered by a settings change
pub const RECONFIGURE_DELAY: Duration = Duration::from_secs(1);

/// Log entries included in the detailed status
const DETAIL_LOG_ENTRIES: usize = 10;

/// Result of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub start_position: u64,
    /// Cursor after the batch
    pub end_position: u64,
    pub processed: u64,
    pub indexed: u64,
    pub skipped: u64,
    pub failed: u64,
    /// The range end was reached and the cursor went back to the start
    pub wrapped: bool,
    /// Stopped early by `pause()`
    pub aborted: bool,
}

struct Shared {
    config: CrawlerConfig,
    status: CrawlerStatus,
}

struct Inner {
    store: Arc<StateStore>,
    worker: Arc<dyn UnitWorker>,
    shared: Mutex<Shared>,
    log: Mutex<CrawlLog>,
    abort: AtomicBool,
    running: AtomicBool,
    /// Signalled whenever a batch finishes
    stopped: Notify,
    schedule: Mutex<Option<ScheduledRun>>,
}

/// Handle to the crawler. Clones share state.
#[derive(Clone)]
pub struct Crawler {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn ids_per_minute(processed: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        processed as f64 * 60.0 / secs
    } else {
        0.0
    }
}

impl Crawler {
    /// Create an idle crawler with default settings. Call
    /// [`Self::initialize`] to load persisted state.
    pub fn new(store: Arc<StateStore>, worker: Arc<dyn UnitWorker>) -> Self {
        let config = CrawlerConfig::default();
        let status = CrawlerStatus::idle(&config);
        Self {
            inner: Arc::new(Inner {
                store,
                worker,
                shared: Mutex::new(Shared { config, status }),
                log: Mutex::new(CrawlLog::default()),
                abort: AtomicBool::new(false),
                running: AtomicBool::new(false),
                stopped: Notify::new(),
                schedule: Mutex::new(None),
            }),
        }
    }

    /// Load settings, cursor, last run, counters and log from the store and
    /// schedule the next run when enabled (immediately when overdue).
    pub fn initialize(&self) -> Result<()> {
        let config = self.restore()?;
        if config.enabled {
            let last_run = lock(&self.inner.shared).status.last_run;
            self.schedule(next_delay(last_run, config.interval(), Utc::now()));
        }
        Ok(())
    }

    /// Load persisted state without scheduling anything.
    pub fn restore(&self) -> Result<CrawlerConfig> {
        let store = &self.inner.store;

        let config = match store.get_value::<CrawlerConfig>(KEY_CONFIG)? {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!("Ignoring stored crawler settings: {}", e);
                    CrawlerConfig::default()
                }
            },
            None => CrawlerConfig::default(),
        };
        let cursor = store
            .get_value::<u64>(KEY_CURSOR)?
            .filter(|c| config.contains(*c))
            .unwrap_or(config.range_start);
        let last_run = store.get_value::<DateTime<Utc>>(KEY_LAST_RUN)?;
        let indexed_count = store.get_value::<u64>(KEY_INDEXED)?.unwrap_or(0);
        let entries = store.recent_log(LOG_CAPACITY)?;

        {
            let mut shared = lock(&self.inner.shared);
            shared.status = CrawlerStatus {
                current_position: cursor,
                indexed_count,
                last_run,
                ..CrawlerStatus::idle(&config)
            };
            shared.config = config.clone();
        }
        *lock(&self.inner.log) = CrawlLog::from_entries(entries);

        info!(
            "Crawler restored at {} of {}..={} (enabled: {})",
            cursor, config.range_start, config.range_end, config.enabled
        );
        Ok(config)
    }

    /// Drop the pending run without touching state or the log.
    pub fn shutdown(&self) {
        self.cancel_schedule();
    }

    /// Start a batch now, leaving the paused state.
    pub fn start(&self) -> Result<()> {
        if self.inner.running.load(Ordering::SeqCst) {
            return Err(CrawlerError::AlreadyRunning.into());
        }
        self.inner.abort.store(false, Ordering::SeqCst);
        lock(&self.inner.shared).status.state = RunState::Idle;
        self.schedule(Duration::ZERO);
        info!("Crawler started");
        Ok(())
    }

    /// Cancel the pending run and stop the current batch after its
    /// in-flight unit.
    pub fn pause(&self) {
        self.inner.abort.store(true, Ordering::SeqCst);
        self.cancel_schedule();
        {
            let mut shared = lock(&self.inner.shared);
            shared.status.state = RunState::Paused;
            shared.status.next_run = None;
        }
        info!("Crawler paused");
        self.record(CrawlerLogEntry::new(0, "pause", "Crawler paused", true));
    }

    /// True while a batch is in progress
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Wait until no batch is in progress. After [`Self::pause`] this
    /// resolves once the in-flight units have finished and the run has been
    /// recorded.
    pub async fn stopped(&self) {
        loop {
            let notified = self.inner.stopped.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }

    /// Merge and persist a settings change. When enabled and idle, a run is
    /// scheduled shortly so the new settings apply promptly.
    pub fn update_config(&self, update: &CrawlerConfigUpdate) -> Result<CrawlerConfig> {
        let (merged, state) = {
            let shared = lock(&self.inner.shared);
            (shared.config.merged(update), shared.status.state)
        };
        merged.validate()?;
        self.inner.store.put_value(KEY_CONFIG, &merged)?;

        let reset_cursor = {
            let mut shared = lock(&self.inner.shared);
            shared.config = merged.clone();
            shared.status.total_count = merged.range_len();
            if merged.contains(shared.status.current_position) {
                None
            } else {
                shared.status.current_position = merged.range_start;
                Some(merged.range_start)
            }
        };
        if let Some(cursor) = reset_cursor {
            self.inner.store.put_value(KEY_CURSOR, &cursor)?;
        }

        info!("Crawler settings updated: {:?}", merged);
        self.record(CrawlerLogEntry::new(
            0,
            "config",
            format!(
                "enabled={} range={}..={} batch={} interval={}m",
                merged.enabled,
                merged.range_start,
                merged.range_end,
                merged.batch_size,
                merged.interval_minutes
            ),
            true,
        ));

        let idle = matches!(state, RunState::Idle | RunState::Error)
            && !self.inner.running.load(Ordering::SeqCst);
        if merged.enabled {
            if idle {
                self.schedule(RECONFIGURE_DELAY);
            }
        } else {
            self.cancel_schedule();
            lock(&self.inner.shared).status.next_run = None;
        }
        Ok(merged)
    }

    pub fn config(&self) -> CrawlerConfig {
        lock(&self.inner.shared).config.clone()
    }

    pub fn get_status(&self) -> CrawlerStatus {
        lock(&self.inner.shared).status.clone()
    }

    pub fn get_detailed_status(&self) -> Result<DetailedStatus> {
        let (status, config) = {
            let shared = lock(&self.inner.shared);
            (shared.status.clone(), shared.config.clone())
        };
        let distinct = self.inner.store.indexed_players()?;
        let recent: Vec<CrawlerLogEntry> = lock(&self.inner.log)
            .newest_first()
            .into_iter()
            .take(DETAIL_LOG_ENTRIES)
            .collect();
        Ok(DetailedStatus::derive(status, config, distinct, recent, Utc::now()))
    }

    /// Log entries, newest first
    pub fn get_log(&self) -> Vec<CrawlerLogEntry> {
        lock(&self.inner.log).newest_first()
    }

    /// Run one batch in the caller's task, clearing a previous pause.
    pub async fn run_once(&self) -> Result<BatchOutcome> {
        self.inner.abort.store(false, Ordering::SeqCst);
        self.run_cycle().await
    }

    fn is_paused(&self) -> bool {
        lock(&self.inner.shared).status.state == RunState::Paused
    }

    fn schedule(&self, delay: Duration) {
        let mut slot = lock(&self.inner.schedule);
        self.arm(&mut slot, delay);
    }

    /// Schedule the next cycle unless a pause has been requested. The check
    /// runs under the schedule lock, and `pause()` raises its flag before
    /// taking that lock, so a pause either prevents the new run or cancels it.
    fn reschedule(&self, delay: Duration) -> bool {
        let mut slot = lock(&self.inner.schedule);
        if self.inner.abort.load(Ordering::SeqCst) {
            return false;
        }
        self.arm(&mut slot, delay);
        true
    }

    fn arm(&self, slot: &mut Option<ScheduledRun>, delay: Duration) {
        let crawler = self.clone();
        let run = ScheduledRun::spawn(delay, move || async move {
            if crawler.is_paused() {
                return;
            }
            if let Err(e) = crawler.run_cycle().await {
                log::debug!("Scheduled crawl ended with error: {}", e);
            }
        });
        let due_at = run.due_at();
        if let Some(previous) = slot.replace(run) {
            previous.cancel();
        }
        lock(&self.inner.shared).status.next_run = Some(due_at);
    }

    fn cancel_schedule(&self) {
        if let Some(run) = lock(&self.inner.schedule).take() {
            run.cancel();
        }
    }

    fn record(&self, entry: CrawlerLogEntry) {
        if let Err(e) = self.inner.store.append_log(&entry) {
            warn!("Failed to persist crawler log entry: {}", e);
        }
        lock(&self.inner.log).push(entry);
    }

    /// One full cycle: batch, bookkeeping, and the next schedule.
    async fn run_cycle(&self) -> Result<BatchOutcome> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(CrawlerError::AlreadyRunning.into());
        }

        let started_at = Utc::now();
        let cursor = {
            let mut shared = lock(&self.inner.shared);
            shared.status.state = RunState::Running;
            shared.status.next_run = None;
            shared.status.last_error = None;
            shared.status.current_position
        };
        info!("Crawler batch starting at {}", cursor);
        self.record(CrawlerLogEntry::new(
            0,
            "start",
            format!("Batch starting at {}", cursor),
            true,
        ));

        let run_id = match self.inner.store.start_run(started_at) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to record crawl run: {}", e);
                None
            }
        };

        let mut batch = BatchOutcome::default();
        let result = self.run_batch(&mut batch).await;

        let finished_at = Utc::now();

        match &result {
            Ok(()) => {
                info!(
                    "Crawler batch finished: {} processed, {} indexed, {} skipped, {} failed",
                    batch.processed, batch.indexed, batch.skipped, batch.failed
                );
                self.record(CrawlerLogEntry::new(
                    0,
                    "finish",
                    format!(
                        "Processed {} ({} indexed, {} skipped, {} failed), next id {}",
                        batch.processed, batch.indexed, batch.skipped, batch.failed, batch.end_position
                    ),
                    true,
                ));
            }
            Err(e) => {
                error!("Crawler batch failed: {}", e);
                self.record(CrawlerLogEntry::new(0, "error", e.to_string(), false));
            }
        }

        // `pause()` raises the flag before taking this lock, so a pause that
        // lands after the batch loop is still seen here.
        let (config, outcome) = {
            let mut shared = lock(&self.inner.shared);
            let paused = self.inner.abort.load(Ordering::SeqCst);
            let (state, outcome) = match (&result, paused) {
                (Err(_), _) => (RunState::Error, RunOutcome::Failed),
                (Ok(()), true) => (RunState::Paused, RunOutcome::Paused),
                (Ok(()), false) => (RunState::Idle, RunOutcome::Completed),
            };
            shared.status.state = state;
            shared.status.last_run = Some(finished_at);
            if let Err(e) = &result {
                shared.status.last_error = Some(e.to_string());
            }
            (shared.config.clone(), outcome)
        };

        if let Err(e) = self.inner.store.put_value(KEY_LAST_RUN, &finished_at) {
            warn!("Failed to persist crawler last run: {}", e);
        }
        if let Some(id) = run_id {
            let counts = (batch.processed, batch.indexed, batch.failed);
            if let Err(e) = self.inner.store.finish_run(id, finished_at, counts, outcome) {
                warn!("Failed to record crawl run: {}", e);
            }
        }

        if config.enabled {
            self.reschedule(config.interval());
        }

        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.stopped.notify_waiters();

        result.map(|()| batch)
    }

    /// Advance the cursor through at most `batch_size` ids.
    async fn run_batch(&self, batch: &mut BatchOutcome) -> Result<()> {
        let (config, mut cursor) = {
            let shared = lock(&self.inner.shared);
            let config = shared.config.clone();
            let cursor = if config.contains(shared.status.current_position) {
                shared.status.current_position
            } else {
                config.range_start
            };
            (config, cursor)
        };
        batch.start_position = cursor;
        batch.end_position = cursor;

        let started = Instant::now();
        let mut budget = u64::from(config.batch_size);
        let group_size = u64::from(config.max_concurrency);

        while budget > 0 {
            if self.inner.abort.load(Ordering::SeqCst) {
                info!("Crawler batch stopped at {}", cursor);
                batch.aborted = true;
                break;
            }

            let len = group_size.min(budget).min(config.range_end - cursor + 1);
            let ids: Vec<u64> = (cursor..cursor + len).collect();
            let results = join_all(ids.iter().map(|id| self.inner.worker.process(*id))).await;

            for (id, result) in ids.into_iter().zip(results) {
                let indexed = matches!(result, Ok(UnitOutcome::Indexed(_)));
                self.record_unit(id, result, batch);

                let (next, wrapped) = config.next_position(id);
                cursor = next;
                batch.wrapped |= wrapped;

                let indexed_count = {
                    let mut shared = lock(&self.inner.shared);
                    shared.status.current_position = cursor;
                    if indexed {
                        shared.status.indexed_count += 1;
                    }
                    shared.status.crawl_speed = ids_per_minute(batch.processed, started.elapsed());
                    shared.status.indexed_count
                };

                self.inner.store.put_value(KEY_CURSOR, &cursor)?;
                if indexed {
                    self.inner.store.put_value(KEY_INDEXED, &indexed_count)?;
                }
            }

            budget -= len;
            batch.end_position = cursor;

            if batch.wrapped {
                info!("Crawler reached the end of its range, next batch starts over");
                self.record(CrawlerLogEntry::new(
                    0,
                    "wrap",
                    format!("Range complete, restarting at {}", config.range_start),
                    true,
                ));
                break;
            }

            if budget > 0 && !config.request_delay().is_zero() {
                tokio::time::sleep(config.request_delay()).await;
            }
        }

        Ok(())
    }

    fn record_unit(&self, id: u64, result: Result<UnitOutcome>, batch: &mut BatchOutcome) {
        batch.processed += 1;
        let entry = match result {
            Ok(UnitOutcome::Indexed(details)) => {
                batch.indexed += 1;
                CrawlerLogEntry::new(id, "index", details, true)
            }
            Ok(UnitOutcome::Skipped(details)) => {
                batch.skipped += 1;
                CrawlerLogEntry::new(id, "skip", details, true)
            }
            Err(e) => {
                batch.failed += 1;
                warn!("Crawler unit {} failed: {}", id, e);
                CrawlerLogEntry::new(id, "fail", e.to_string(), false)
            }
        };
        self.record(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;

    #[derive(Default)]
    struct FakeWorker {
        seen: Mutex<Vec<u64>>,
        fail: Vec<u64>,
        skip: Vec<u64>,
        delay: Duration,
    }

    impl FakeWorker {
        fn seen(&self) -> Vec<u64> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UnitWorker for FakeWorker {
        async fn process(&self, id: u64) -> Result<UnitOutcome> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.seen.lock().unwrap().push(id);
            if self.fail.contains(&id) {
                Err(ApiError::Timeout.into())
            } else if self.skip.contains(&id) {
                Ok(UnitOutcome::Skipped(format!("no player {}", id)))
            } else {
                Ok(UnitOutcome::Indexed(format!("player {}", id)))
            }
        }
    }

    fn settings(range_end: u64, batch_size: u32) -> CrawlerConfigUpdate {
        CrawlerConfigUpdate {
            range_start: Some(1),
            range_end: Some(range_end),
            batch_size: Some(batch_size),
            request_delay_ms: Some(0),
            ..Default::default()
        }
    }

    fn crawler(store: &Arc<StateStore>, worker: &Arc<FakeWorker>, update: CrawlerConfigUpdate) -> Crawler {
        let crawler = Crawler::new(store.clone(), worker.clone());
        crawler.initialize().unwrap();
        crawler.update_config(&update).unwrap();
        crawler
    }

    fn memory_store() -> Arc<StateStore> {
        Arc::new(StateStore::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_batch_advances_at_most_batch_size() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(100, 5));

        let batch = crawler.run_once().await.unwrap();
        assert_eq!(batch.processed, 5);
        assert_eq!(batch.start_position, 1);
        assert_eq!(batch.end_position, 6);
        assert_eq!(worker.seen(), vec![1, 2, 3, 4, 5]);

        let status = crawler.get_status();
        assert_eq!(status.state, RunState::Idle);
        assert_eq!(status.current_position, 6);
        assert_eq!(status.indexed_count, 5);
        assert!(status.last_run.is_some());
        assert_eq!(store.get_value::<u64>(KEY_CURSOR).unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_cursor_wraps_at_range_end() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(3, 10));

        let batch = crawler.run_once().await.unwrap();
        assert_eq!(batch.processed, 3);
        assert!(batch.wrapped);
        assert_eq!(crawler.get_status().current_position, 1);
        assert_eq!(worker.seen(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unit_failure_is_skipped() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker {
            fail: vec![2],
            skip: vec![3],
            ..Default::default()
        });
        let crawler = crawler(&store, &worker, settings(100, 4));

        let batch = crawler.run_once().await.unwrap();
        assert_eq!(batch.processed, 4);
        assert_eq!(batch.indexed, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(crawler.get_status().current_position, 5);
        assert_eq!(crawler.get_status().state, RunState::Idle);

        let log = crawler.get_log();
        let failure = log.iter().find(|e| e.action == "fail").unwrap();
        assert_eq!(failure.id, 2);
        assert!(!failure.success);
        let skip = log.iter().find(|e| e.action == "skip").unwrap();
        assert!(skip.success);
    }

    #[tokio::test]
    async fn test_resumes_from_persisted_cursor() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        {
            let first = crawler(&store, &worker, settings(100, 1));
            first.run_once().await.unwrap();
        }
        store.put_value(KEY_CURSOR, &42u64).unwrap();

        let restarted = Crawler::new(store.clone(), worker.clone());
        restarted.initialize().unwrap();
        assert_eq!(restarted.get_status().current_position, 42);
        assert_eq!(restarted.get_status().indexed_count, 1);

        restarted.run_once().await.unwrap();
        assert_eq!(worker.seen(), vec![1, 42]);
    }

    #[tokio::test]
    async fn test_out_of_range_cursor_restarts_range() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(100, 1));
        store.put_value(KEY_CURSOR, &500u64).unwrap();

        crawler.initialize().unwrap();
        assert_eq!(crawler.get_status().current_position, 1);
    }

    #[tokio::test]
    async fn test_settings_and_log_survive_restart() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let first = crawler(&store, &worker, settings(50, 2));
        first.run_once().await.unwrap();

        let restarted = Crawler::new(store.clone(), worker);
        restarted.initialize().unwrap();
        assert_eq!(restarted.config(), first.config());
        assert_eq!(restarted.config().range_end, 50);

        let log = restarted.get_log();
        assert_eq!(log[0].action, "finish");
        assert_eq!(log.len(), first.get_log().len());
    }

    #[tokio::test]
    async fn test_invalid_settings_are_rejected() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(100, 5));

        let err = crawler
            .update_config(&CrawlerConfigUpdate {
                range_start: Some(200),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, crate::Error::Crawler(CrawlerError::InvalidConfig(_))));
        assert_eq!(crawler.config().range_start, 1);
    }

    #[tokio::test]
    async fn test_systemic_failure_sets_error_and_reschedules() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(
            &store,
            &worker,
            CrawlerConfigUpdate {
                enabled: Some(true),
                ..settings(100, 5)
            },
        );
        store.break_for_test();

        let err = crawler.run_once().await.unwrap_err();
        let status = crawler.get_status();
        assert_eq!(status.state, RunState::Error);
        assert_eq!(status.last_error, Some(err.to_string()));

        let next = status.next_run.expect("next run scheduled");
        assert!(next > Utc::now() + chrono::TimeDelta::minutes(59));
        crawler.shutdown();
    }

    #[tokio::test]
    async fn test_pause_stops_batch_at_unit_boundary() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker {
            delay: Duration::from_millis(20),
            ..Default::default()
        });
        let crawler = crawler(&store, &worker, settings(1_000, 100));

        let running = crawler.clone();
        let handle = tokio::spawn(async move { running.run_once().await });
        tokio::time::sleep(Duration::from_millis(90)).await;
        crawler.pause();

        let batch = handle.await.unwrap().unwrap();
        assert!(batch.aborted);
        assert!(batch.processed < 100);
        assert_eq!(batch.end_position, 1 + batch.processed);
        assert_eq!(crawler.get_status().state, RunState::Paused);
        assert!(crawler.get_status().next_run.is_none());
    }

    #[tokio::test]
    async fn test_pause_cancels_scheduled_run() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(
            &store,
            &worker,
            CrawlerConfigUpdate {
                enabled: Some(true),
                ..settings(100, 5)
            },
        );
        assert!(crawler.get_status().next_run.is_some());

        crawler.pause();
        assert!(crawler.get_status().next_run.is_none());

        tokio::time::sleep(RECONFIGURE_DELAY + Duration::from_millis(300)).await;
        assert!(worker.seen().is_empty());
        assert_eq!(crawler.get_status().state, RunState::Paused);
    }

    #[tokio::test]
    async fn test_stopped_waits_for_paused_run_to_be_recorded() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker {
            delay: Duration::from_millis(20),
            ..Default::default()
        });
        let crawler = crawler(&store, &worker, settings(1_000, 100));

        crawler.start().unwrap();
        tokio::time::sleep(Duration::from_millis(90)).await;
        assert!(crawler.is_running());

        crawler.pause();
        crawler.stopped().await;

        assert!(!crawler.is_running());
        let runs = store.recent_runs(1).unwrap();
        assert_eq!(runs[0].outcome, RunOutcome::Paused);
        assert!(runs[0].finished_at.is_some());
        assert_eq!(runs[0].processed, worker.seen().len() as u64);
        assert!(store.get_value::<DateTime<Utc>>(KEY_LAST_RUN).unwrap().is_some());
        assert_eq!(crawler.get_status().state, RunState::Paused);
    }

    #[tokio::test]
    async fn test_concurrent_groups_save_cursor_after_each_group() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(
            &store,
            &worker,
            CrawlerConfigUpdate {
                max_concurrency: Some(3),
                ..settings(100, 5)
            },
        );

        let batch = crawler.run_once().await.unwrap();
        assert_eq!(batch.processed, 5);
        assert_eq!(batch.end_position, 6);
        let mut seen = worker.seen();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.get_value::<u64>(KEY_CURSOR).unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_stopped_returns_at_once_when_idle() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(100, 5));
        tokio::time::timeout(Duration::from_secs(1), crawler.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reschedule_is_skipped_after_pause() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(
            &store,
            &worker,
            CrawlerConfigUpdate {
                enabled: Some(true),
                ..settings(100, 5)
            },
        );

        crawler.pause();
        assert!(!crawler.reschedule(Duration::from_secs(60)));
        assert!(crawler.get_status().next_run.is_none());

        crawler.run_once().await.unwrap();
        assert!(crawler.get_status().next_run.is_some());
        crawler.shutdown();
    }

    #[tokio::test]
    async fn test_overdue_enabled_crawler_runs_on_initialize() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        store
            .put_value(
                KEY_CONFIG,
                &CrawlerConfig {
                    enabled: true,
                    range_end: 100,
                    batch_size: 2,
                    request_delay_ms: 0,
                    ..Default::default()
                },
            )
            .unwrap();

        let crawler = Crawler::new(store.clone(), worker.clone());
        crawler.initialize().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(worker.seen(), vec![1, 2]);
        let status = crawler.get_status();
        assert_eq!(status.state, RunState::Idle);
        assert!(status.next_run.is_some());
        crawler.shutdown();
    }

    #[tokio::test]
    async fn test_not_overdue_waits() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        store
            .put_value(
                KEY_CONFIG,
                &CrawlerConfig {
                    enabled: true,
                    ..Default::default()
                },
            )
            .unwrap();
        store.put_value(KEY_LAST_RUN, &Utc::now()).unwrap();

        let crawler = Crawler::new(store, worker.clone());
        crawler.initialize().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(worker.seen().is_empty());
        let next = crawler.get_status().next_run.unwrap();
        assert!(next > Utc::now() + chrono::TimeDelta::minutes(59));
        crawler.shutdown();
    }

    #[tokio::test]
    async fn test_restore_does_not_schedule() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        store
            .put_value(
                KEY_CONFIG,
                &CrawlerConfig {
                    enabled: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let crawler = Crawler::new(store, worker.clone());
        let config = crawler.restore().unwrap();
        assert!(config.enabled);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(worker.seen().is_empty());
        assert!(crawler.get_status().next_run.is_none());
    }

    #[tokio::test]
    async fn test_only_one_batch_at_a_time() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker {
            delay: Duration::from_millis(20),
            ..Default::default()
        });
        let crawler = crawler(&store, &worker, settings(100, 5));

        let (a, b) = tokio::join!(crawler.run_once(), crawler.run_once());
        let already_running = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(crate::Error::Crawler(CrawlerError::AlreadyRunning))))
            .count();
        assert_eq!(already_running, 1);
        assert!(a.is_ok() || b.is_ok());
    }

    #[tokio::test]
    async fn test_detailed_status_reports_progress() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker::default());
        let crawler = crawler(&store, &worker, settings(100, 5));
        crawler.run_once().await.unwrap();

        let detail = crawler.get_detailed_status().unwrap();
        assert_eq!(detail.remaining, 95);
        assert_eq!(detail.progress_percent, 5.0);
        assert!(detail.recent_log.len() <= DETAIL_LOG_ENTRIES);
        assert_eq!(detail.recent_log[0].action, "finish");
    }

    #[tokio::test]
    async fn test_run_history_is_recorded() {
        let store = memory_store();
        let worker = Arc::new(FakeWorker {
            fail: vec![1],
            ..Default::default()
        });
        let crawler = crawler(&store, &worker, settings(100, 3));
        crawler.run_once().await.unwrap();

        let runs = store.recent_runs(5).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].processed, 3);
        assert_eq!(runs[0].failed, 1);
        assert_eq!(runs[0].outcome, RunOutcome::Completed);
    }
}
