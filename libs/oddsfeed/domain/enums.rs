//! Closed value domains carried by feed messages
//!
//! Each enumeration maps the vendor's integer codes and keeps out-of-domain
//! values in an explicit unknown variant instead of failing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketStatus {
    Active,
    Suspended,
    Deactivated,
    HandedOver,
    Settled,
    Cancelled,
    Unknown(i32),
}

impl MarketStatus {
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => MarketStatus::Active,
            -1 => MarketStatus::Suspended,
            0 => MarketStatus::Deactivated,
            -2 => MarketStatus::HandedOver,
            -3 => MarketStatus::Settled,
            -4 => MarketStatus::Cancelled,
            other => MarketStatus::Unknown(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), MarketStatus::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashoutStatus {
    Available,
    Unavailable,
    Closed,
    Unknown(i32),
}

impl CashoutStatus {
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => CashoutStatus::Available,
            -1 => CashoutStatus::Unavailable,
            -2 => CashoutStatus::Closed,
            other => CashoutStatus::Unknown(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), CashoutStatus::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddsChangeReason {
    Normal,
    RiskAdjustment,
    Unknown(i32),
}

impl OddsChangeReason {
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => OddsChangeReason::Normal,
            1 => OddsChangeReason::RiskAdjustment,
            other => OddsChangeReason::Unknown(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), OddsChangeReason::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureChangeType {
    New,
    DateTime,
    Cancelled,
    Format,
    Coverage,
    /// Value outside the known domain
    Other(i32),
}

impl FixtureChangeType {
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => FixtureChangeType::New,
            2 => FixtureChangeType::DateTime,
            3 => FixtureChangeType::Cancelled,
            4 => FixtureChangeType::Format,
            5 => FixtureChangeType::Coverage,
            other => FixtureChangeType::Other(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), FixtureChangeType::Other(_))
    }
}

/// How certain a settlement is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementCertainty {
    LiveScouted,
    Confirmed,
    Unknown(i32),
}

impl SettlementCertainty {
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => SettlementCertainty::LiveScouted,
            2 => SettlementCertainty::Confirmed,
            other => SettlementCertainty::Unknown(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), SettlementCertainty::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeResult {
    Lost,
    Won,
    UndecidedYet,
    Unknown(i32),
}

impl OutcomeResult {
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => OutcomeResult::Lost,
            1 => OutcomeResult::Won,
            -1 => OutcomeResult::UndecidedYet,
            other => OutcomeResult::Unknown(other),
        }
    }

    pub fn is_known(value: i32) -> bool {
        !matches!(Self::from_wire(value), OutcomeResult::Unknown(_))
    }
}

/// Competitor side an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(HomeAway::Home),
            2 => Some(HomeAway::Away),
            _ => None,
        }
    }
}

/// Outcome active flag; the wire carries 0 or 1
pub fn outcome_active_from_wire(value: i32) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Id from an open catalog of named values (betstop reasons, betting statuses)
///
/// The descriptions live in a vendor catalog outside this crate, so only the
/// id is carried; negative ids are outside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedValue {
    pub id: i32,
}

impl NamedValue {
    pub fn is_known(value: i32) -> bool {
        value >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_status_codes() {
        assert_eq!(MarketStatus::from_wire(1), MarketStatus::Active);
        assert_eq!(MarketStatus::from_wire(-4), MarketStatus::Cancelled);
        assert_eq!(MarketStatus::from_wire(7), MarketStatus::Unknown(7));
        assert!(!MarketStatus::is_known(7));
    }

    #[test]
    fn test_fixture_change_out_of_domain() {
        assert_eq!(FixtureChangeType::from_wire(100), FixtureChangeType::Other(100));
        assert!(FixtureChangeType::is_known(3));
    }

    #[test]
    fn test_team_and_active_flag() {
        assert_eq!(HomeAway::from_wire(2), Some(HomeAway::Away));
        assert_eq!(HomeAway::from_wire(3), None);
        assert_eq!(outcome_active_from_wire(1), Some(true));
        assert_eq!(outcome_active_from_wire(5), None);
    }
}
