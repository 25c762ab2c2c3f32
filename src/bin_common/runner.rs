//! Binary runner utilities
//!
//! Standard startup and shutdown banners around a binary's main work.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Log a progress line every this many processed items
    pub progress_every: usize,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            progress_every: 1000,
        }
    }

    pub fn with_progress_every(mut self, items: usize) -> Self {
        self.progress_every = items.max(1);
        self
    }
}

/// Trait for binary applications
pub trait BinaryRunner {
    /// Run the application; returns a one-line summary
    async fn run(&mut self) -> anyhow::Result<String>;

    fn config(&self) -> &RunConfig;

    fn print_banner(&self) {
        let config = self.config();
        info!("========================================");
        info!("Starting {}", config.name);
        info!("========================================");
    }

    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("========================================");
        info!("{} finished", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with banners around it
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let summary = self.run().await?;
        self.print_shutdown(Some(&summary));
        Ok(())
    }
}
