use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("oddsfeed={level},{level}")));

    // Ignore the error when a subscriber is already installed (tests, repeated init)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .try_init();
}
