//! Delivery processing and event fan-out

pub mod handler;
pub mod feed;

pub use handler::{spawn_handler, FeedHandler, HandlerResult};
pub use feed::{FeedPipeline, PipelineEvent};
