//! Conversion of validated wire messages into domain messages

pub mod mapper;
pub mod names;

pub use mapper::FeedMessageMapper;
pub use names::expand_name;
