//! Wire messages as decoded from queue payloads

pub mod deserializer;
pub mod wire;

pub use deserializer::{DecodeError, JsonWireDeserializer, WireDeserializer};
pub use wire::*;
