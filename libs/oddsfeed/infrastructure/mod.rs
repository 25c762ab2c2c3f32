//! Infrastructure layer: catalog HTTP client, configuration loading, logging

pub mod client;
pub mod config;
mod logging;

pub use client::HttpCatalogClient;
pub use config::{CacheConfig, CatalogConfig, ConfigError, FeedConfig};
pub use logging::init_tracing;
