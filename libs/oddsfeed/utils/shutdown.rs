//! Stop flag for a running feed
//!
//! The feed loop polls [`ShutdownManager::is_running`] between deliveries and
//! handler threads receive the same flag through [`ShutdownManager::flag`].
//! Ctrl+C or the end of the input clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

pub struct ShutdownManager {
    running: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Clear the flag on Ctrl+C; deliveries already read are still processed
    pub fn spawn_signal_handler(&self) {
        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received, finishing current delivery and stopping feed");
                running.store(false, Ordering::Release);
            }
        });
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the feed once the input is exhausted
    pub fn trigger(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Flag handed to `spawn_handler` so handler threads drain and exit
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_seen_by_handler_flags() {
        let shutdown = ShutdownManager::new();
        let handler_flag = shutdown.flag();
        assert!(shutdown.is_running());
        assert!(handler_flag.load(Ordering::Acquire));

        shutdown.trigger();
        assert!(!shutdown.is_running());
        assert!(!handler_flag.load(Ordering::Acquire));
    }
}
