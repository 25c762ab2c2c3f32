//! Markets and outcomes as delivered to subscribers

use super::enums::{CashoutStatus, HomeAway, MarketStatus, OutcomeResult};
use super::{Language, Specifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Names keyed by language
pub type LocalizedNames = HashMap<Language, String>;

/// Vendor-native identity of a market for the producer that sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMappingInfo {
    pub producer_id: i32,
    /// Raw vendor market id (`8:232`)
    pub market_id: String,
    pub market_type_id: Option<i32>,
    pub market_sub_type_id: Option<i32>,
    pub sov_template: Option<String>,
}

/// Vendor-native identity of an outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMappingInfo {
    pub product_outcome_id: String,
    pub product_outcome_names: LocalizedNames,
}

/// Identity and resolved names shared by every market shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: i32,
    pub specifiers: Specifiers,
    pub extended_specifiers: Option<String>,
    /// Names per requested language; empty when the description is unknown
    pub names: LocalizedNames,
    pub mapping: Option<MarketMappingInfo>,
}

impl Market {
    pub fn name(&self, language: &Language) -> Option<&str> {
        self.names.get(language).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub names: LocalizedNames,
    pub mapping: Option<OutcomeMappingInfo>,
}

impl Outcome {
    pub fn name(&self, language: &Language) -> Option<&str> {
        self.names.get(language).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsValues {
    pub outcome: Outcome,
    pub odds: Option<f64>,
    pub probability: Option<f64>,
    pub active: Option<bool>,
}

/// Priced outcome; competitor outcomes also carry their side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutcomeOdds {
    Plain(OddsValues),
    Player { values: OddsValues, team: HomeAway },
}

impl OutcomeOdds {
    pub fn values(&self) -> &OddsValues {
        match self {
            OutcomeOdds::Plain(values) | OutcomeOdds::Player { values, .. } => values,
        }
    }

    pub fn team(&self) -> Option<HomeAway> {
        match self {
            OutcomeOdds::Plain(_) => None,
            OutcomeOdds::Player { team, .. } => Some(*team),
        }
    }

    pub fn id(&self) -> &str {
        &self.values().outcome.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketWithOdds {
    pub market: Market,
    pub status: MarketStatus,
    pub cashout_status: Option<CashoutStatus>,
    pub is_favourite: Option<bool>,
    pub outcomes: Option<Vec<OutcomeOdds>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSettlement {
    pub outcome: Outcome,
    pub result: OutcomeResult,
    pub void_factor: Option<f64>,
    pub dead_heat_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketWithSettlement {
    pub market: Market,
    pub void_reason: Option<i32>,
    pub outcomes: Option<Vec<OutcomeSettlement>>,
}

/// Market named by a cancellation or rollback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCancel {
    pub market: Market,
    pub void_reason: Option<i32>,
}
