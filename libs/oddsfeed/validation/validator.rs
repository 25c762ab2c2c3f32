//! Structural validation of decoded messages
//!
//! Validation never fails with an error. It grades a message as usable,
//! usable with problems, or unusable, and flags offending markets and
//! outcomes so that later stages can tell which parts were suspicious.

use crate::cache::MarketCacheProvider;
use crate::domain::{
    outcome_active_from_wire, parse_specifiers, CashoutStatus, FixtureChangeType, HomeAway,
    MarketStatus, NamedValue, OddsChangeReason, OutcomeResult, SettlementCertainty, Specifiers,
    Urn,
};
use crate::messages::{
    WireMarketRef, WireMessage, WireOddsMarket, WireOddsOutcome, WireSettlementMarket,
    WireSettlementOutcome,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of validating one message; variants are ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationResult {
    Success,
    /// Message is usable but some values are outside their domain
    ProblemsDetected,
    /// Message cannot be mapped
    Failure,
}

impl ValidationResult {
    pub fn worst(self, other: ValidationResult) -> ValidationResult {
        self.max(other)
    }

    pub fn is_usable(&self) -> bool {
        *self != ValidationResult::Failure
    }
}

/// Accumulates the result while walking a message
struct Findings<'a> {
    message_type: &'static str,
    event_id: &'a str,
    result: ValidationResult,
}

impl<'a> Findings<'a> {
    fn problem(&mut self, detail: String) {
        debug!(
            "Problem in {} for {}: {}",
            self.message_type, self.event_id, detail
        );
        self.result = self.result.worst(ValidationResult::ProblemsDetected);
    }

    fn failure(&mut self, detail: String) {
        warn!(
            "Invalid {} for {}: {}",
            self.message_type, self.event_id, detail
        );
        self.result = ValidationResult::Failure;
    }

    /// Records a problem when `value` is specified but outside its domain
    fn check_domain(&mut self, field: &str, value: i32, specified: bool, known: fn(i32) -> bool) -> bool {
        if specified && !known(value) {
            self.problem(format!("{} has out-of-domain value {}", field, value));
            return false;
        }
        true
    }
}

/// Stateless validator; the provider is only peeked, never fetched through
#[derive(Clone, Default)]
pub struct FeedMessageValidator {
    provider: Option<Arc<MarketCacheProvider>>,
}

impl FeedMessageValidator {
    pub fn new(provider: Arc<MarketCacheProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Validator that skips the declared-specifier check
    pub fn without_catalog() -> Self {
        Self { provider: None }
    }

    pub fn validate(&self, message: &mut WireMessage) -> ValidationResult {
        let message_type = message.message_type().as_str();
        let event_id = message.event_id().map(str::to_string);
        let mut findings = Findings {
            message_type,
            event_id: event_id.as_deref().unwrap_or("-"),
            result: ValidationResult::Success,
        };

        if let Some(raw) = event_id.as_deref() {
            if let Err(e) = Urn::parse(raw) {
                findings.failure(format!("event id '{}' is malformed: {}", raw, e));
                return findings.result;
            }
        }

        match message {
            WireMessage::OddsChange(m) => {
                findings.check_domain(
                    "odds_change_reason",
                    m.odds_change_reason,
                    m.odds_change_reason_specified,
                    OddsChangeReason::is_known,
                );
                findings.check_domain(
                    "betstop_reason",
                    m.betstop_reason,
                    m.betstop_reason_specified,
                    NamedValue::is_known,
                );
                findings.check_domain(
                    "betting_status",
                    m.betting_status,
                    m.betting_status_specified,
                    NamedValue::is_known,
                );
                for market in m.markets.iter_mut().flatten() {
                    self.check_odds_market(&mut findings, market);
                }
            }
            WireMessage::Cashout(m) => {
                for market in m.markets.iter_mut().flatten() {
                    self.check_odds_market(&mut findings, market);
                }
            }
            WireMessage::BetStop(m) => {
                findings.check_domain(
                    "market_status",
                    m.market_status,
                    m.market_status_specified,
                    MarketStatus::is_known,
                );
            }
            WireMessage::FixtureChange(m) => {
                findings.check_domain(
                    "change_type",
                    m.change_type,
                    m.change_type_specified,
                    FixtureChangeType::is_known,
                );
            }
            WireMessage::BetSettlement(m) => {
                findings.check_domain("certainty", m.certainty, true, SettlementCertainty::is_known);
                match m.markets.as_mut() {
                    Some(markets) => {
                        for market in markets {
                            self.check_settlement_market(&mut findings, market);
                        }
                    }
                    None => findings.failure("markets are missing".to_string()),
                }
            }
            WireMessage::BetCancel(m) => {
                self.check_market_refs(&mut findings, m.markets.as_mut());
            }
            WireMessage::RollbackBetSettlement(m) => {
                self.check_market_refs(&mut findings, m.markets.as_mut());
            }
            WireMessage::RollbackBetCancel(m) => {
                self.check_market_refs(&mut findings, m.markets.as_mut());
            }
            WireMessage::Alive(_) | WireMessage::SnapshotComplete(_) => {}
        }

        findings.result
    }

    /// Specifier string well-formedness plus presence of every declared specifier
    fn check_specifiers(
        &self,
        findings: &mut Findings<'_>,
        market_id: i32,
        raw: Option<&str>,
    ) -> bool {
        let specifiers = match raw {
            Some(raw) => match parse_specifiers(raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    findings.problem(format!("market {} specifiers '{}': {}", market_id, raw, e));
                    return false;
                }
            },
            None => Specifiers::new(),
        };

        let declared = self
            .provider
            .as_ref()
            .and_then(|provider| provider.declared_specifiers(market_id));
        if let Some(declared) = declared {
            let missing: Vec<&str> = declared
                .iter()
                .map(|s| s.name.as_str())
                .filter(|name| !specifiers.contains_key(*name))
                .collect();
            if !missing.is_empty() {
                findings.problem(format!(
                    "market {} is missing declared specifiers {:?}",
                    market_id, missing
                ));
                return false;
            }
        }
        true
    }

    fn check_odds_market(&self, findings: &mut Findings<'_>, market: &mut WireOddsMarket) {
        let mut valid = self.check_specifiers(findings, market.id, market.specifiers.as_deref());
        valid &= findings.check_domain("market status", market.status, true, MarketStatus::is_known);
        valid &= findings.check_domain(
            "cashout_status",
            market.cashout_status,
            market.cashout_status_specified,
            CashoutStatus::is_known,
        );
        market.validation_failed = !valid;

        for outcome in market.outcomes.iter_mut().flatten() {
            check_odds_outcome(findings, market.id, outcome);
        }
    }

    fn check_settlement_market(&self, findings: &mut Findings<'_>, market: &mut WireSettlementMarket) {
        market.validation_failed =
            !self.check_specifiers(findings, market.id, market.specifiers.as_deref());
        for outcome in market.outcomes.iter_mut().flatten() {
            check_settlement_outcome(findings, market.id, outcome);
        }
    }

    fn check_market_refs(&self, findings: &mut Findings<'_>, markets: Option<&mut Vec<WireMarketRef>>) {
        let Some(markets) = markets else {
            findings.failure("markets are missing".to_string());
            return;
        };
        for market in markets {
            market.validation_failed =
                !self.check_specifiers(findings, market.id, market.specifiers.as_deref());
        }
    }
}

fn check_odds_outcome(findings: &mut Findings<'_>, market_id: i32, outcome: &mut WireOddsOutcome) {
    let mut valid = findings.check_domain("outcome active", outcome.active, outcome.active_specified, |v| {
        outcome_active_from_wire(v).is_some()
    });
    valid &= findings.check_domain("outcome team", outcome.team, outcome.team_specified, |v| {
        HomeAway::from_wire(v).is_some()
    });
    if outcome.odds_specified && !(outcome.odds.is_finite() && outcome.odds >= 0.0) {
        findings.problem(format!(
            "market {} outcome {} has invalid odds {}",
            market_id, outcome.id, outcome.odds
        ));
        valid = false;
    }
    outcome.validation_failed = !valid;
}

fn check_settlement_outcome(
    findings: &mut Findings<'_>,
    market_id: i32,
    outcome: &mut WireSettlementOutcome,
) {
    let mut valid = findings.check_domain("outcome result", outcome.result, true, OutcomeResult::is_known);
    if outcome.void_factor_specified && !(0.0..=1.0).contains(&outcome.void_factor) {
        findings.problem(format!(
            "market {} outcome {} has void factor {}",
            market_id, outcome.id, outcome.void_factor
        ));
        valid = false;
    }
    outcome.validation_failed = !valid;
}
