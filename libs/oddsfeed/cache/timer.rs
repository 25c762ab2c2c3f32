//! Periodic background refresh

use futures::future::BoxFuture;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Owns a periodic refresh task; the task is aborted when the handle drops
#[derive(Debug)]
pub struct RefreshHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        debug!("[{}] Stopping refresh timer", self.name);
        self.task.abort();
    }
}

/// Run `tick` after `startup_delay` and then every `interval`
///
/// Ticks never overlap: a slow tick delays the next one instead of bursting.
pub fn spawn_periodic<F>(
    name: &'static str,
    startup_delay: Duration,
    interval: Duration,
    tick: F,
) -> RefreshHandle
where
    F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(startup_delay).await;
        info!(
            "[{}] Refresh timer started with interval: {:?}",
            name, interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            debug!("[{}] Refresh tick", name);
            tick().await;
        }
    });

    RefreshHandle { name, task }
}
