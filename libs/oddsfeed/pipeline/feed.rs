//! Per-delivery driver: routing key, decode, validate, map, publish

use crate::domain::{FeedMessage, Language, SportEventKind, Urn};
use crate::mapping::FeedMessageMapper;
use crate::messages::WireDeserializer;
use crate::routing::{parse_sport_id, MessageType, RoutingKey};
use crate::validation::{FeedMessageValidator, ValidationResult};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a delivery turned into
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Message mapped; `validation` tells whether problems were found
    Message {
        routing_key: String,
        sport_id: Option<Urn>,
        validation: ValidationResult,
        message: FeedMessage,
    },
    /// Payload could not be decoded
    DecodeFailed { routing_key: String, reason: String },
    /// Message decoded but could not be turned into a domain message
    Unusable {
        routing_key: String,
        message_type: MessageType,
        event_id: Option<String>,
        reason: String,
    },
}

impl PipelineEvent {
    pub fn routing_key(&self) -> &str {
        match self {
            PipelineEvent::Message { routing_key, .. }
            | PipelineEvent::DecodeFailed { routing_key, .. }
            | PipelineEvent::Unusable { routing_key, .. } => routing_key,
        }
    }
}

pub struct FeedPipeline {
    deserializer: Arc<dyn WireDeserializer>,
    validator: FeedMessageValidator,
    mapper: FeedMessageMapper,
    languages: Vec<Language>,
    requested_kind: Option<SportEventKind>,
    subscribers: Mutex<Vec<Sender<PipelineEvent>>>,
}

impl FeedPipeline {
    pub fn new(
        deserializer: Arc<dyn WireDeserializer>,
        validator: FeedMessageValidator,
        mapper: FeedMessageMapper,
        languages: Vec<Language>,
    ) -> Self {
        Self {
            deserializer,
            validator,
            mapper,
            languages,
            requested_kind: None,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Map every event as `kind`; deliveries whose event cannot be represented become unusable
    pub fn with_event_kind(mut self, kind: SportEventKind) -> Self {
        self.requested_kind = Some(kind);
        self
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// New receiver of every event published from now on
    pub fn subscribe(&self) -> Receiver<PipelineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    fn publish(&self, event: &PipelineEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Run one delivery through the pipeline and publish the outcome
    ///
    /// Returns `None` for an empty or absent payload.
    pub async fn process(&self, routing_key: &str, payload: Option<&[u8]>) -> Option<PipelineEvent> {
        let payload = match payload {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                debug!("Empty payload for routing key '{}', ignoring", routing_key);
                return None;
            }
        };

        let event = self.run(routing_key, payload).await;
        self.publish(&event);
        Some(event)
    }

    async fn run(&self, routing_key: &str, payload: &[u8]) -> PipelineEvent {
        let key = match RoutingKey::parse(routing_key) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Unparsable routing key '{}': {}", routing_key, e);
                None
            }
        };

        let mut wire = match self.deserializer.deserialize(payload) {
            Ok(wire) => wire,
            Err(e) => {
                warn!("Failed to decode payload for '{}': {}", routing_key, e);
                return PipelineEvent::DecodeFailed {
                    routing_key: routing_key.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let message_type = wire.message_type();
        // The key's sport only counts when it was routed for this message type
        let sport_id = key
            .as_ref()
            .and_then(|_| parse_sport_id(routing_key, message_type).ok().flatten());

        let validation = self.validator.validate(&mut wire);
        if validation == ValidationResult::Failure {
            return PipelineEvent::Unusable {
                routing_key: routing_key.to_string(),
                message_type,
                event_id: wire.event_id().map(str::to_string),
                reason: "validation failed".to_string(),
            };
        }

        match self
            .mapper
            .map(&wire, &self.languages, self.requested_kind, sport_id.as_ref())
            .await
        {
            Ok(message) => {
                debug!(
                    "Mapped {} from '{}' ({:?})",
                    message_type, routing_key, validation
                );
                PipelineEvent::Message {
                    routing_key: routing_key.to_string(),
                    sport_id,
                    validation,
                    message,
                }
            }
            Err(e) => {
                warn!("Failed to map {} from '{}': {}", message_type, routing_key, e);
                PipelineEvent::Unusable {
                    routing_key: routing_key.to_string(),
                    message_type,
                    event_id: wire.event_id().map(str::to_string),
                    reason: e.to_string(),
                }
            }
        }
    }
}
