//! Routing keys of delivered messages
//!
//! Layout: `priority.pre|virt.live.msgtype.sport.prefix:type.eventId.node`.
//! Segments that do not apply to a message are the literal `-`.

use crate::domain::Urn;
use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PLACEHOLDER: &str = "-";

const PRIORITY: usize = 0;
const PRE_OR_VIRTUAL: usize = 1;
const LIVE: usize = 2;
const MESSAGE_TYPE: usize = 3;
const SPORT: usize = 4;
const EVENT_TYPE: usize = 5;
const EVENT_ID: usize = 6;
const NODE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    OddsChange,
    BetStop,
    BetSettlement,
    BetCancel,
    RollbackBetSettlement,
    RollbackBetCancel,
    FixtureChange,
    Cashout,
    Alive,
    SnapshotComplete,
}

impl MessageType {
    pub const ALL: [MessageType; 10] = [
        MessageType::OddsChange,
        MessageType::BetStop,
        MessageType::BetSettlement,
        MessageType::BetCancel,
        MessageType::RollbackBetSettlement,
        MessageType::RollbackBetCancel,
        MessageType::FixtureChange,
        MessageType::Cashout,
        MessageType::Alive,
        MessageType::SnapshotComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::OddsChange => "odds_change",
            MessageType::BetStop => "bet_stop",
            MessageType::BetSettlement => "bet_settlement",
            MessageType::BetCancel => "bet_cancel",
            MessageType::RollbackBetSettlement => "rollback_bet_settlement",
            MessageType::RollbackBetCancel => "rollback_bet_cancel",
            MessageType::FixtureChange => "fixture_change",
            MessageType::Cashout => "cashout",
            MessageType::Alive => "alive",
            MessageType::SnapshotComplete => "snapshot_complete",
        }
    }

    /// System messages that are not tied to a sport or event
    pub fn is_scopeless(&self) -> bool {
        matches!(self, MessageType::Alive | MessageType::SnapshotComplete)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FeedError::InvalidFormat(format!("unknown message type '{}'", s)))
    }
}

fn segments(key: &str, required: usize) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.len() < required {
        return Err(FeedError::InvalidFormat(format!(
            "routing key '{}' has {} segments, expected at least {}",
            key,
            segments.len(),
            required
        )));
    }
    Ok(segments)
}

/// Sport id embedded in `key` for a message of type `expected`
///
/// `Ok(None)` when the key carries another message type, when `expected` is
/// a scope-less system message, or when the sport segment is `-`. A sport
/// segment that is not an integer is a format error.
pub fn parse_sport_id(key: &str, expected: MessageType) -> Result<Option<Urn>> {
    let segments = segments(key, SPORT + 1)?;

    if segments[MESSAGE_TYPE] != expected.as_str() || expected.is_scopeless() {
        return Ok(None);
    }

    let sport = segments[SPORT];
    if sport == PLACEHOLDER {
        return Ok(None);
    }

    sport
        .parse::<i64>()
        .map(|id| Some(Urn::sport(id)))
        .map_err(|_| {
            FeedError::InvalidFormat(format!(
                "routing key '{}' has a non-numeric sport id '{}'",
                key, sport
            ))
        })
}

/// Non-failing form of [`parse_sport_id`]
pub fn try_parse_sport_id(key: &str, expected: MessageType) -> Option<Urn> {
    parse_sport_id(key, expected).ok().flatten()
}

/// Event urn carried in the `prefix:type` and id segments, if any
pub fn parse_event_id(key: &str) -> Result<Option<Urn>> {
    let segments = segments(key, EVENT_ID + 1)?;
    let (event_type, event_id) = (segments[EVENT_TYPE], segments[EVENT_ID]);
    if event_type == PLACEHOLDER || event_id == PLACEHOLDER {
        return Ok(None);
    }
    Urn::parse(&format!("{}:{}", event_type, event_id)).map(Some)
}

/// All segments of a delivered routing key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingKey {
    pub priority: Option<String>,
    pub pre_or_virtual: Option<String>,
    pub live: Option<String>,
    /// Raw message-type token
    pub message_type: String,
    pub sport_id: Option<Urn>,
    pub event_id: Option<Urn>,
    pub node: Option<String>,
}

fn segment(value: Option<&&str>) -> Option<String> {
    value
        .filter(|s| !s.is_empty() && **s != PLACEHOLDER)
        .map(|s| s.to_string())
}

impl RoutingKey {
    pub fn parse(key: &str) -> Result<Self> {
        let segments = segments(key, SPORT + 1)?;
        let message_type = segments[MESSAGE_TYPE].to_string();

        let sport_id = match message_type.parse::<MessageType>() {
            Ok(known) => parse_sport_id(key, known)?,
            Err(_) => None,
        };
        let event_id = if segments.len() > EVENT_ID {
            parse_event_id(key)?
        } else {
            None
        };

        Ok(Self {
            priority: segment(segments.get(PRIORITY)),
            pre_or_virtual: segment(segments.get(PRE_OR_VIRTUAL)),
            live: segment(segments.get(LIVE)),
            message_type,
            sport_id,
            event_id,
            node: segment(segments.get(NODE)),
        })
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.message_type.parse().ok()
    }

    pub fn is_live(&self) -> bool {
        self.live.as_deref() == Some("live")
    }

    pub fn is_virtual(&self) -> bool {
        self.pre_or_virtual.as_deref() == Some("virt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ODDS_CHANGE_KEY: &str = "hi.-.live.odds_change.6.sr:match.9536715";

    #[test]
    fn test_parse_sport_id() {
        let sport = parse_sport_id(ODDS_CHANGE_KEY, MessageType::OddsChange).unwrap();
        assert_eq!(sport, Some(Urn::sport(6)));
    }

    #[test]
    fn test_other_type_yields_none() {
        assert_eq!(parse_sport_id(ODDS_CHANGE_KEY, MessageType::BetStop).unwrap(), None);
        assert!(try_parse_sport_id(ODDS_CHANGE_KEY, MessageType::BetStop).is_none());
    }

    #[test]
    fn test_non_numeric_sport_is_format_error() {
        let err = parse_sport_id("hi.-.live.odds_change.6b.sr:match.9536715", MessageType::OddsChange)
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidFormat(_)));
        assert!(try_parse_sport_id("hi.-.live.odds_change.6b.sr:match.1", MessageType::OddsChange).is_none());
    }

    #[test]
    fn test_missing_delimiter_is_format_error() {
        assert!(parse_sport_id("odds_change", MessageType::OddsChange).is_err());
    }

    #[test]
    fn test_scopeless_type_yields_none() {
        assert_eq!(parse_sport_id("-.-.-.alive.-.-.-.-", MessageType::Alive).unwrap(), None);
        assert_eq!(
            parse_sport_id("-.-.-.snapshot_complete.-.-.-.1", MessageType::SnapshotComplete).unwrap(),
            None
        );
    }

    #[test]
    fn test_parse_event_id() {
        let event = parse_event_id(ODDS_CHANGE_KEY).unwrap().unwrap();
        assert_eq!(event.to_string(), "sr:match:9536715");
        assert_eq!(parse_event_id("-.-.-.alive.-.-.-.-").unwrap(), None);
    }

    #[test]
    fn test_full_key() {
        let key = RoutingKey::parse("lo.pre.-.bet_settlement.1.sr:match.42.node7").unwrap();
        assert_eq!(key.priority.as_deref(), Some("lo"));
        assert_eq!(key.message_type(), Some(MessageType::BetSettlement));
        assert_eq!(key.sport_id, Some(Urn::sport(1)));
        assert_eq!(key.event_id.as_ref().unwrap().id(), 42);
        assert_eq!(key.node.as_deref(), Some("node7"));
        assert!(!key.is_live());
    }

    #[test]
    fn test_message_type_round_trip() {
        for t in MessageType::ALL {
            assert_eq!(t.as_str().parse::<MessageType>().unwrap(), t);
        }
        assert!("product_down".parse::<MessageType>().is_err());
    }
}
