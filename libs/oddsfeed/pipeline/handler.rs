//! Pipeline event handlers on dedicated threads
//!
//! Each handler owns one receiver and runs on its own OS thread, so events
//! reach it strictly in publish order. Handlers never run inside the async
//! runtime and may block.

use super::feed::PipelineEvent;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error};

pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Consumer of pipeline events
///
/// A returned error is logged and the handler keeps receiving.
pub trait FeedHandler: Send + 'static {
    fn handle(&mut self, event: PipelineEvent) -> HandlerResult;
}

impl<F> FeedHandler for F
where
    F: FnMut(PipelineEvent) -> HandlerResult + Send + 'static,
{
    fn handle(&mut self, event: PipelineEvent) -> HandlerResult {
        self(event)
    }
}

/// Run `handler` on a new thread until the channel closes or `running` turns false
pub fn spawn_handler<H: FeedHandler>(
    name: &str,
    receiver: Receiver<PipelineEvent>,
    mut handler: H,
    running: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    let name = name.to_string();
    std::thread::Builder::new()
        .name(format!("feed-handler-{}", name))
        .spawn(move || loop {
            match receiver.recv_timeout(Duration::from_millis(50)) {
                Ok(event) => {
                    if let Err(e) = handler.handle(event) {
                        error!("Handler '{}' failed: {}", name, e);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if !running.load(Ordering::Acquire) {
                        debug!("Shutdown requested, handler '{}' exiting", name);
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Event channel closed, handler '{}' exiting", name);
                    break;
                }
            }
        })
}
