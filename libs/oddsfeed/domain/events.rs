//! Typed feed messages emitted by the mapper

use super::enums::{
    FixtureChangeType, MarketStatus, NamedValue, OddsChangeReason, SettlementCertainty,
};
use super::market::{MarketCancel, MarketWithOdds, MarketWithSettlement};
use super::{Producer, SportEvent};
use crate::routing::MessageType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields shared by every event-scoped message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHeader {
    pub producer: Producer,
    /// Generation time in epoch milliseconds, as sent
    pub timestamp: i64,
    pub request_id: Option<i64>,
    pub event: SportEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsChange {
    pub header: EventHeader,
    pub change_reason: Option<OddsChangeReason>,
    pub betstop_reason: Option<NamedValue>,
    pub betting_status: Option<NamedValue>,
    pub markets: Option<Vec<MarketWithOdds>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetStop {
    pub header: EventHeader,
    pub groups: Option<Vec<String>>,
    pub market_status: Option<MarketStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSettlement {
    pub header: EventHeader,
    pub certainty: SettlementCertainty,
    pub markets: Option<Vec<MarketWithSettlement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetCancel {
    pub header: EventHeader,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub superceded_by: Option<String>,
    pub markets: Option<Vec<MarketCancel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackBetSettlement {
    pub header: EventHeader,
    pub markets: Option<Vec<MarketCancel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackBetCancel {
    pub header: EventHeader,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub markets: Option<Vec<MarketCancel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureChange {
    pub header: EventHeader,
    pub change_type: Option<FixtureChangeType>,
    pub start_time: Option<DateTime<Utc>>,
    pub next_live_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashoutProbabilities {
    pub header: EventHeader,
    pub markets: Option<Vec<MarketWithOdds>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alive {
    pub producer: Producer,
    pub timestamp: i64,
    pub subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotComplete {
    pub producer: Producer,
    pub timestamp: i64,
    pub request_id: i64,
}

/// Any mapped message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedMessage {
    OddsChange(OddsChange),
    BetStop(BetStop),
    BetSettlement(BetSettlement),
    BetCancel(BetCancel),
    RollbackBetSettlement(RollbackBetSettlement),
    RollbackBetCancel(RollbackBetCancel),
    FixtureChange(FixtureChange),
    Cashout(CashoutProbabilities),
    Alive(Alive),
    SnapshotComplete(SnapshotComplete),
}

impl FeedMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            FeedMessage::OddsChange(_) => MessageType::OddsChange,
            FeedMessage::BetStop(_) => MessageType::BetStop,
            FeedMessage::BetSettlement(_) => MessageType::BetSettlement,
            FeedMessage::BetCancel(_) => MessageType::BetCancel,
            FeedMessage::RollbackBetSettlement(_) => MessageType::RollbackBetSettlement,
            FeedMessage::RollbackBetCancel(_) => MessageType::RollbackBetCancel,
            FeedMessage::FixtureChange(_) => MessageType::FixtureChange,
            FeedMessage::Cashout(_) => MessageType::Cashout,
            FeedMessage::Alive(_) => MessageType::Alive,
            FeedMessage::SnapshotComplete(_) => MessageType::SnapshotComplete,
        }
    }

    /// Header of event-scoped messages
    pub fn header(&self) -> Option<&EventHeader> {
        match self {
            FeedMessage::OddsChange(m) => Some(&m.header),
            FeedMessage::BetStop(m) => Some(&m.header),
            FeedMessage::BetSettlement(m) => Some(&m.header),
            FeedMessage::BetCancel(m) => Some(&m.header),
            FeedMessage::RollbackBetSettlement(m) => Some(&m.header),
            FeedMessage::RollbackBetCancel(m) => Some(&m.header),
            FeedMessage::FixtureChange(m) => Some(&m.header),
            FeedMessage::Cashout(m) => Some(&m.header),
            FeedMessage::Alive(_) | FeedMessage::SnapshotComplete(_) => None,
        }
    }

    pub fn producer(&self) -> &Producer {
        match self {
            FeedMessage::OddsChange(m) => &m.header.producer,
            FeedMessage::BetStop(m) => &m.header.producer,
            FeedMessage::BetSettlement(m) => &m.header.producer,
            FeedMessage::BetCancel(m) => &m.header.producer,
            FeedMessage::RollbackBetSettlement(m) => &m.header.producer,
            FeedMessage::RollbackBetCancel(m) => &m.header.producer,
            FeedMessage::FixtureChange(m) => &m.header.producer,
            FeedMessage::Cashout(m) => &m.header.producer,
            FeedMessage::Alive(m) => &m.producer,
            FeedMessage::SnapshotComplete(m) => &m.producer,
        }
    }

    pub fn event(&self) -> Option<&SportEvent> {
        self.header().map(|h| &h.event)
    }
}
