//! Schedulers for delayed work

use parking_lot::Mutex;
use std::time::Duration;

use tabgroup_core::{ScheduledTask, Scheduler};

/// Queues tasks until the caller runs them. Delays are recorded, not waited on.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<(Duration, ScheduledTask)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.lock().iter().map(|(delay, _)| *delay).collect()
    }

    /// Run every queued task in scheduling order and return their results.
    /// Tasks scheduled while running stay queued for the next call.
    pub fn run_pending(&self) -> Vec<tabgroup_core::Result<()>> {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        tasks.into_iter().map(|(_, task)| task()).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Task scheduled");
        self.tasks.lock().push((delay, task));
    }
}

/// Runs tasks on a tokio runtime after their delay
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime of the calling task
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = task() {
                tracing::error!(error = %e, "Scheduled task failed");
            }
        });
    }
}
