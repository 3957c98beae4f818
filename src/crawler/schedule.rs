//! Cancellable delayed task

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;

/// A task that starts after a delay unless cancelled first.
///
/// Cancelling only affects the wait; once the task has started it runs to
/// completion on its own.
#[derive(Debug)]
pub struct ScheduledRun {
    timer: JoinHandle<()>,
    due_at: DateTime<Utc>,
}

impl ScheduledRun {
    pub fn spawn<F, Fut>(delay: Duration, task: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let due_at = Utc::now() + TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero());
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task());
        });
        Self { timer, due_at }
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// True until the task has been started or cancelled
    pub fn is_pending(&self) -> bool {
        !self.timer.is_finished()
    }

    pub fn cancel(self) {
        self.timer.abort();
    }
}

/// Delay until the next run: zero when never run or overdue.
pub fn next_delay(last_run: Option<DateTime<Utc>>, interval: Duration, now: DateTime<Utc>) -> Duration {
    let Some(last_run) = last_run else {
        return Duration::ZERO;
    };
    let due = last_run + TimeDelta::from_std(interval).unwrap_or(TimeDelta::zero());
    (due - now).to_std().unwrap_or(Duration::ZERO)
}
