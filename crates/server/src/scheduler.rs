//! Timer-driven refresh of the published skill table.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::registry::SkillRegistry;

/// Default period between scheduled refreshes.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Spawns the periodic refresh task.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Starts refreshing `registry` every `period` on the current tokio runtime.
    ///
    /// The first tick fires one period from now; the startup pass is the one
    /// done by [`SkillRegistry::bootstrap`]. Ticks go through
    /// [`SkillRegistry::refresh_now`], so they coalesce with on-demand refreshes.
    pub fn spawn(registry: SkillRegistry, period: Duration) -> RefreshHandle {
        let period = period.max(MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match registry.refresh_now().await {
                    Ok(table) => tracing::trace!(
                        target: "universal_skills::refresh",
                        skills = table.len(),
                        "scheduled refresh complete"
                    ),
                    Err(err) => tracing::warn!(
                        target: "universal_skills::refresh",
                        error = %err,
                        "scheduled refresh failed; keeping previous skill table"
                    ),
                }
            }
        });
        tracing::debug!(
            target: "universal_skills::refresh",
            period_ms = period.as_millis() as u64,
            "refresh scheduler started"
        );
        RefreshHandle { task }
    }
}

/// Owns the scheduler task. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// True while the timer task is alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the timer. A pass already in flight still completes for its waiters.
    pub fn shutdown(self) {}
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
