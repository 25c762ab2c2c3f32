//! Decoded wire messages
//!
//! Field names follow the vendor schema. Optional scalars arrive as a value
//! plus a `*_specified` flag; the mapper turns each pair into an `Option`.
//! `validation_failed` flags are set by the validator and never decoded.

use crate::routing::MessageType;
use serde::{Deserialize, Serialize};

/// Value of an optional wire scalar, `None` unless its flag is set
pub fn specified<T: Copy>(value: T, specified: bool) -> Option<T> {
    specified.then_some(value)
}

// ============================================================================
// Odds change / cashout
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireOddsOutcome {
    pub id: String,
    pub odds: f64,
    pub odds_specified: bool,
    pub probabilities: f64,
    pub probabilities_specified: bool,
    pub active: i32,
    pub active_specified: bool,
    /// 1 home, 2 away
    pub team: i32,
    pub team_specified: bool,
    #[serde(skip)]
    pub validation_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireOddsMarket {
    pub id: i32,
    pub specifiers: Option<String>,
    pub extended_specifiers: Option<String>,
    pub status: i32,
    pub cashout_status: i32,
    pub cashout_status_specified: bool,
    pub favourite: i32,
    pub favourite_specified: bool,
    pub outcomes: Option<Vec<WireOddsOutcome>>,
    #[serde(skip)]
    pub validation_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireOddsChange {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub odds_change_reason: i32,
    pub odds_change_reason_specified: bool,
    pub betstop_reason: i32,
    pub betstop_reason_specified: bool,
    pub betting_status: i32,
    pub betting_status_specified: bool,
    pub markets: Option<Vec<WireOddsMarket>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCashout {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub markets: Option<Vec<WireOddsMarket>>,
}

// ============================================================================
// Bet stop / fixture change
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireBetStop {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    /// Pipe-delimited market groups
    pub groups: Option<String>,
    pub market_status: i32,
    pub market_status_specified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireFixtureChange {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub change_type: i32,
    pub change_type_specified: bool,
    pub start_time: i64,
    pub start_time_specified: bool,
    pub next_live_time: i64,
    pub next_live_time_specified: bool,
}

// ============================================================================
// Settlement and cancellation
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireSettlementOutcome {
    pub id: String,
    pub result: i32,
    pub void_factor: f64,
    pub void_factor_specified: bool,
    pub dead_heat_factor: f64,
    pub dead_heat_factor_specified: bool,
    #[serde(skip)]
    pub validation_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireSettlementMarket {
    pub id: i32,
    pub specifiers: Option<String>,
    pub void_reason: i32,
    pub void_reason_specified: bool,
    pub outcomes: Option<Vec<WireSettlementOutcome>>,
    #[serde(skip)]
    pub validation_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireBetSettlement {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub certainty: i32,
    pub markets: Option<Vec<WireSettlementMarket>>,
}

/// Market reference carried by cancellations and rollbacks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireMarketRef {
    pub id: i32,
    pub specifiers: Option<String>,
    pub void_reason: i32,
    pub void_reason_specified: bool,
    #[serde(skip)]
    pub validation_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireBetCancel {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub start_time: i64,
    pub start_time_specified: bool,
    pub end_time: i64,
    pub end_time_specified: bool,
    pub superceded_by: Option<String>,
    pub markets: Option<Vec<WireMarketRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireRollbackBetSettlement {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub markets: Option<Vec<WireMarketRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireRollbackBetCancel {
    pub product: i32,
    pub event_id: String,
    pub timestamp: i64,
    pub request_id: i64,
    pub request_id_specified: bool,
    pub start_time: i64,
    pub start_time_specified: bool,
    pub end_time: i64,
    pub end_time_specified: bool,
    pub markets: Option<Vec<WireMarketRef>>,
}

// ============================================================================
// System messages
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireAlive {
    pub product: i32,
    pub timestamp: i64,
    /// 1 when the session is subscribed
    pub subscribed: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireSnapshotComplete {
    pub product: i32,
    pub timestamp: i64,
    pub request_id: i64,
}

// ============================================================================
// Envelope
// ============================================================================

/// Any decoded message, tagged by its type token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireMessage {
    OddsChange(WireOddsChange),
    BetStop(WireBetStop),
    BetSettlement(WireBetSettlement),
    BetCancel(WireBetCancel),
    RollbackBetSettlement(WireRollbackBetSettlement),
    RollbackBetCancel(WireRollbackBetCancel),
    FixtureChange(WireFixtureChange),
    Cashout(WireCashout),
    Alive(WireAlive),
    SnapshotComplete(WireSnapshotComplete),
}

impl WireMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            WireMessage::OddsChange(_) => MessageType::OddsChange,
            WireMessage::BetStop(_) => MessageType::BetStop,
            WireMessage::BetSettlement(_) => MessageType::BetSettlement,
            WireMessage::BetCancel(_) => MessageType::BetCancel,
            WireMessage::RollbackBetSettlement(_) => MessageType::RollbackBetSettlement,
            WireMessage::RollbackBetCancel(_) => MessageType::RollbackBetCancel,
            WireMessage::FixtureChange(_) => MessageType::FixtureChange,
            WireMessage::Cashout(_) => MessageType::Cashout,
            WireMessage::Alive(_) => MessageType::Alive,
            WireMessage::SnapshotComplete(_) => MessageType::SnapshotComplete,
        }
    }

    pub fn product(&self) -> i32 {
        match self {
            WireMessage::OddsChange(m) => m.product,
            WireMessage::BetStop(m) => m.product,
            WireMessage::BetSettlement(m) => m.product,
            WireMessage::BetCancel(m) => m.product,
            WireMessage::RollbackBetSettlement(m) => m.product,
            WireMessage::RollbackBetCancel(m) => m.product,
            WireMessage::FixtureChange(m) => m.product,
            WireMessage::Cashout(m) => m.product,
            WireMessage::Alive(m) => m.product,
            WireMessage::SnapshotComplete(m) => m.product,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            WireMessage::OddsChange(m) => m.timestamp,
            WireMessage::BetStop(m) => m.timestamp,
            WireMessage::BetSettlement(m) => m.timestamp,
            WireMessage::BetCancel(m) => m.timestamp,
            WireMessage::RollbackBetSettlement(m) => m.timestamp,
            WireMessage::RollbackBetCancel(m) => m.timestamp,
            WireMessage::FixtureChange(m) => m.timestamp,
            WireMessage::Cashout(m) => m.timestamp,
            WireMessage::Alive(m) => m.timestamp,
            WireMessage::SnapshotComplete(m) => m.timestamp,
        }
    }

    /// Raw event id; `None` for system messages
    pub fn event_id(&self) -> Option<&str> {
        match self {
            WireMessage::OddsChange(m) => Some(&m.event_id),
            WireMessage::BetStop(m) => Some(&m.event_id),
            WireMessage::BetSettlement(m) => Some(&m.event_id),
            WireMessage::BetCancel(m) => Some(&m.event_id),
            WireMessage::RollbackBetSettlement(m) => Some(&m.event_id),
            WireMessage::RollbackBetCancel(m) => Some(&m.event_id),
            WireMessage::FixtureChange(m) => Some(&m.event_id),
            WireMessage::Cashout(m) => Some(&m.event_id),
            WireMessage::Alive(_) | WireMessage::SnapshotComplete(_) => None,
        }
    }

    pub fn request_id(&self) -> Option<i64> {
        match self {
            WireMessage::OddsChange(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::BetStop(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::BetSettlement(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::BetCancel(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::RollbackBetSettlement(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::RollbackBetCancel(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::FixtureChange(m) => specified(m.request_id, m.request_id_specified),
            WireMessage::SnapshotComplete(m) => Some(m.request_id),
            WireMessage::Cashout(_) | WireMessage::Alive(_) => None,
        }
    }
}
