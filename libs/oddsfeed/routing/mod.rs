//! Routing key parsing and subscription binding generation

pub mod interest;
pub mod routing_key;

pub use interest::{generate_event_keys, generate_keys, MessageInterest, SYSTEM_BINDING};
pub use routing_key::{
    parse_event_id, parse_sport_id, try_parse_sport_id, MessageType, RoutingKey, PLACEHOLDER,
};
