//! Payload decoding

use super::wire::WireMessage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Payload is empty")]
    EmptyPayload,

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Turns raw delivery payloads into wire messages
pub trait WireDeserializer: Send + Sync {
    fn deserialize(&self, payload: &[u8]) -> Result<WireMessage>;
}

/// Decoder for JSON payloads of the form `{"odds_change": {...}}`
#[derive(Debug, Clone, Default)]
pub struct JsonWireDeserializer;

impl WireDeserializer for JsonWireDeserializer {
    fn deserialize(&self, payload: &[u8]) -> Result<WireMessage> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::EmptyPayload);
        }
        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::MessageType;

    #[test]
    fn test_decodes_alive() {
        let message = JsonWireDeserializer
            .deserialize(br#"{"alive":{"product":3,"timestamp":1,"subscribed":1}}"#)
            .unwrap();
        assert_eq!(message.message_type(), MessageType::Alive);
        assert_eq!(message.product(), 3);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            JsonWireDeserializer.deserialize(b"<odds_change/>"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            JsonWireDeserializer.deserialize(b"  "),
            Err(DecodeError::EmptyPayload)
        ));
        assert!(JsonWireDeserializer
            .deserialize(br#"{"product_down":{}}"#)
            .is_err());
    }
}
