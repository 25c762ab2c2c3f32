//! Sports Odds Feed Client
//!
//! Turns raw queue deliveries into typed, localized feed messages:
//! routing key parsing, wire decoding, validation against the market
//! catalog, and mapping into domain events.

pub mod cache;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod mapping;
pub mod messages;
pub mod pipeline;
pub mod routing;
pub mod utils;
pub mod validation;

// Re-export commonly used items
pub use cache::{CacheInvalidationHub, CacheSettings, CatalogSource, MarketCacheProvider};
pub use domain::{FeedMessage, Language, Specifiers, SportEventKind, Urn};
pub use error::{FeedError, Result};
pub use infrastructure::{init_tracing, FeedConfig, HttpCatalogClient};
pub use mapping::FeedMessageMapper;
pub use messages::{JsonWireDeserializer, WireDeserializer, WireMessage};
pub use pipeline::{spawn_handler, FeedHandler, FeedPipeline, PipelineEvent};
pub use routing::{generate_keys, MessageInterest, MessageType, RoutingKey};
pub use utils::ShutdownManager;
pub use validation::{FeedMessageValidator, ValidationResult};
