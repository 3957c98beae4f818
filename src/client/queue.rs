//! Rate-limited request queue for Torn API calls
//!
//! Every outbound call is funnelled through one FIFO dispatcher. The
//! dispatcher runs calls one at a time, keeps a calls-per-window budget
//! over fixed windows, and spaces consecutive calls by a minimum delay.
//!
//! The window boundaries are fixed (aligned to when the queue was created),
//! not sliding per call, so a burst right before a boundary followed by a
//! burst right after it can briefly exceed the average rate.

use std::collections::VecDeque;
use std::future::Future;
use std::num::NonZeroU32;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::error::{ApiError, Result};

/// Torn allows 100 calls per minute per user; stay well under it by default.
pub const DEFAULT_CALLS_PER_MINUTE: u32 = 60;

/// Minimum spacing between two dispatched calls.
pub const DEFAULT_INTER_CALL_DELAY: Duration = Duration::from_millis(100);

/// Length of one budget window.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Tuning for a [`RequestQueue`].
#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Calls allowed per window
    pub calls_per_window: u32,
    /// Window length (60s in production)
    pub window: Duration,
    /// Minimum spacing between consecutive calls
    pub inter_call_delay: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            calls_per_window: DEFAULT_CALLS_PER_MINUTE,
            window: RATE_WINDOW,
            inter_call_delay: DEFAULT_INTER_CALL_DELAY,
        }
    }
}

impl QueueSettings {
    /// Settings with a per-minute budget and the default spacing.
    pub fn per_minute(calls: u32) -> Self {
        Self {
            calls_per_window: calls,
            ..Self::default()
        }
    }

    /// Set the inter-call delay.
    pub fn inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }
}

/// Point-in-time view of the queue, for status displays.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub pending: usize,
    pub calls_this_window: u32,
    pub budget: u32,
    pub window_resets_in: Duration,
    pub dispatched_total: u64,
    pub dispatching: bool,
}

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Call budget for the current fixed window.
#[derive(Debug)]
struct RateWindow {
    calls: u32,
    budget: u32,
    length: Duration,
    reset_at: Instant,
}

impl RateWindow {
    fn new(budget: u32, length: Duration, now: Instant) -> Self {
        Self {
            calls: 0,
            budget,
            length,
            reset_at: now + length,
        }
    }

    /// Zero the counter if one or more window boundaries have passed.
    fn roll(&mut self, now: Instant) {
        if now < self.reset_at {
            return;
        }
        let behind = now.duration_since(self.reset_at).as_nanos();
        let skipped = (behind / self.length.as_nanos()) as u32;
        self.reset_at += self.length * (skipped + 1);
        self.calls = 0;
    }

    fn has_capacity(&self) -> bool {
        self.calls < self.budget
    }
}

struct QueueInner {
    pending: Mutex<VecDeque<Job>>,
    window: Mutex<RateWindow>,
    pacer: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    dispatching: AtomicBool,
    dispatched: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// FIFO queue that serializes calls against the upstream budget.
///
/// Cloning is cheap; clones share the same queue and budget.
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(QueueSettings::default())
    }
}

impl RequestQueue {
    /// Create a queue. The first budget window starts now.
    pub fn new(settings: QueueSettings) -> Self {
        let budget = settings.calls_per_window.max(1);
        let window = settings.window.max(Duration::from_millis(1));

        // governor enforces the spacing: one cell per `inter_call_delay`, no burst
        let pacer = Quota::with_period(settings.inter_call_delay)
            .map(|q| RateLimiter::direct(q.allow_burst(NonZeroU32::MIN)));

        Self {
            inner: Arc::new(QueueInner {
                pending: Mutex::new(VecDeque::new()),
                window: Mutex::new(RateWindow::new(budget, window, Instant::now())),
                pacer,
                dispatching: AtomicBool::new(false),
                dispatched: AtomicU64::new(0),
            }),
        }
    }

    /// Append `work` to the queue.
    ///
    /// Returns a future that resolves with `work`'s result once the dispatcher
    /// has run it. Failures only reach this call's future; the dispatcher moves
    /// on to the next call. Nothing is retried.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn enqueue<T, F>(&self, work: F) -> impl Future<Output = Result<T>> + Send + 'static
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => {
                    // Receiver gone means the caller stopped waiting
                    let _ = tx.send(result);
                }
                Err(_) => warn!("Queued call panicked; its caller sees a closed queue"),
            }
        });

        lock(&self.inner.pending).push_back(job);
        QueueInner::kick(&self.inner);

        async move {
            rx.await
                .unwrap_or_else(|_| Err(ApiError::QueueClosed.into()))
        }
    }

    /// Current queue state.
    pub fn snapshot(&self) -> QueueSnapshot {
        let pending = lock(&self.inner.pending).len();
        let mut window = lock(&self.inner.window);
        let now = Instant::now();
        window.roll(now);
        QueueSnapshot {
            pending,
            calls_this_window: window.calls,
            budget: window.budget,
            window_resets_in: window.reset_at.saturating_duration_since(now),
            dispatched_total: self.inner.dispatched.load(Ordering::Relaxed),
            dispatching: self.inner.dispatching.load(Ordering::Acquire),
        }
    }
}

impl QueueInner {
    /// Start the dispatch loop unless one is already running.
    fn kick(this: &Arc<Self>) {
        if this.dispatching.swap(true, Ordering::AcqRel) {
            return;
        }
        let inner = Arc::clone(this);
        tokio::spawn(async move { inner.dispatch().await });
    }

    async fn dispatch(self: Arc<Self>) {
        loop {
            if lock(&self.pending).is_empty() {
                self.dispatching.store(false, Ordering::Release);
                // An enqueue may have slipped in between the check and the store
                if lock(&self.pending).is_empty() || self.dispatching.swap(true, Ordering::AcqRel)
                {
                    return;
                }
                continue;
            }

            self.wait_for_budget().await;
            if let Some(pacer) = &self.pacer {
                pacer.until_ready().await;
            }

            let Some(job) = lock(&self.pending).pop_front() else {
                continue;
            };
            lock(&self.window).calls += 1;
            self.dispatched.fetch_add(1, Ordering::Relaxed);

            job.await;
        }
    }

    async fn wait_for_budget(&self) {
        loop {
            let reset_at = {
                let mut window = lock(&self.window);
                window.roll(Instant::now());
                if window.has_capacity() {
                    return;
                }
                window.reset_at
            };
            debug!(
                "Call budget exhausted, waiting {:?} for the window to reset",
                reset_at.saturating_duration_since(Instant::now())
            );
            tokio::time::sleep_until(reset_at).await;
        }
    }
}
