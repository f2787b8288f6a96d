//! # Cancellable Periodic Task
//!
//! [`PeriodicTask`] runs an async tick immediately and then on a fixed period in its own
//! Tokio task, until it is stopped. The handle is the only way to reach the task:
//!
//! - [`PeriodicTask::stop`] consumes the handle, aborts the task and waits for it to finish.
//! - Dropping a handle that was never stopped aborts the task as well, so a torn-down
//!   owner can never leave a timer behind.
//!
//! Ticks never overlap: the next tick is scheduled only after the previous one returned.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Handle to a running periodic task.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawns `tick` on the current runtime.
    ///
    /// The first tick runs right away; subsequent ticks run every `period`. A zero period
    /// is bumped to one millisecond.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        info!(task = name, period_ms = period.as_millis() as u64, "Periodic task started");

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                debug!(task = name, "Tick");
                tick().await;
            }
        });

        Self {
            name,
            period,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the underlying task is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the task and waits until it has fully terminated.
    ///
    /// Consuming `self` guarantees the stop runs at most once per task.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // An aborted task resolves to a cancellation error; that is the expected outcome
            let _ = handle.await;
            info!(task = self.name, "Periodic task stopped");
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = self.name, "Periodic task aborted on drop");
        }
    }
}
