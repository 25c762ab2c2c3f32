//! Wire message to domain message mapping
//!
//! The mapper expects a message that passed validation. It resolves every
//! market through the [`MarketCacheProvider`], expands names for each
//! requested language, and turns each `value` + `*_specified` pair into an
//! `Option`. Absent wire collections stay absent, empty ones stay empty.

use super::names::expand_name;
use crate::cache::{MarketCacheProvider, ResolvedDescription};
use crate::domain::{
    outcome_active_from_wire, parse_specifiers, Alive, BetCancel, BetSettlement, BetStop,
    CashoutProbabilities, CashoutStatus, EventHeader, FeedMessage, FixtureChange,
    FixtureChangeType, HomeAway, Language, LocalizedNames, Market, MarketCancel,
    MarketMappingInfo, MarketStatus, MarketWithOdds, MarketWithSettlement, NamedValue,
    OddsChange, OddsChangeReason, OddsValues, Outcome, OutcomeMappingInfo, OutcomeOdds,
    OutcomeResult, OutcomeSettlement, ProducerRegistry, RollbackBetCancel,
    RollbackBetSettlement, SettlementCertainty, SnapshotComplete, Specifiers, SportEventFactory,
    SportEventKind, Urn,
};
use crate::error::{FeedError, Result};
use crate::messages::{
    specified, WireMarketRef, WireMessage, WireOddsMarket, WireOddsOutcome,
    WireSettlementMarket, WireSettlementOutcome,
};
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

fn to_datetime(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

fn split_groups(groups: Option<&str>) -> Option<Vec<String>> {
    groups.map(|raw| {
        raw.split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// A market whose description has been resolved for this occurrence
struct ResolvedMarket {
    market: Market,
    resolved: ResolvedDescription,
    specifiers: Specifiers,
}

impl ResolvedMarket {
    fn outcome(&self, outcome_id: &str, languages: &[Language]) -> Outcome {
        let names: LocalizedNames = languages
            .iter()
            .filter_map(|language| {
                let template = self.resolved.outcome_template(outcome_id, language)?;
                Some((language.clone(), expand_name(template, &self.specifiers)))
            })
            .collect();

        let mapping = self
            .resolved
            .outcome_mapping(outcome_id)
            .map(|mapping| OutcomeMappingInfo {
                product_outcome_id: mapping.product_outcome_id.clone(),
                product_outcome_names: mapping.product_outcome_names.clone(),
            });

        Outcome {
            id: outcome_id.to_string(),
            names,
            mapping,
        }
    }
}

pub struct FeedMessageMapper {
    provider: Arc<MarketCacheProvider>,
    producers: Arc<dyn ProducerRegistry>,
    events: Arc<dyn SportEventFactory>,
}

impl FeedMessageMapper {
    pub fn new(
        provider: Arc<MarketCacheProvider>,
        producers: Arc<dyn ProducerRegistry>,
        events: Arc<dyn SportEventFactory>,
    ) -> Self {
        Self {
            provider,
            producers,
            events,
        }
    }

    /// Map a validated wire message
    ///
    /// `requested_kind` forces the event wrapper type; a kind that cannot
    /// represent the message's event id is a hard error. `sport_id` is the
    /// sport taken from the routing key, if known.
    pub async fn map(
        &self,
        message: &WireMessage,
        languages: &[Language],
        requested_kind: Option<SportEventKind>,
        sport_id: Option<&Urn>,
    ) -> Result<FeedMessage> {
        let producer_id = message.product();
        let header = match message.event_id() {
            Some(event_id) => Some(self.header(message, event_id, languages, requested_kind, sport_id)?),
            None => None,
        };

        let mapped = match (message, header) {
            (WireMessage::OddsChange(m), Some(header)) => FeedMessage::OddsChange(OddsChange {
                header,
                change_reason: specified(m.odds_change_reason, m.odds_change_reason_specified)
                    .map(OddsChangeReason::from_wire),
                betstop_reason: specified(m.betstop_reason, m.betstop_reason_specified)
                    .map(|id| NamedValue { id }),
                betting_status: specified(m.betting_status, m.betting_status_specified)
                    .map(|id| NamedValue { id }),
                markets: self
                    .odds_markets(m.markets.as_deref(), producer_id, languages)
                    .await,
            }),
            (WireMessage::Cashout(m), Some(header)) => {
                FeedMessage::Cashout(CashoutProbabilities {
                    header,
                    markets: self
                        .odds_markets(m.markets.as_deref(), producer_id, languages)
                        .await,
                })
            }
            (WireMessage::BetStop(m), Some(header)) => FeedMessage::BetStop(BetStop {
                header,
                groups: split_groups(m.groups.as_deref()),
                market_status: specified(m.market_status, m.market_status_specified)
                    .map(MarketStatus::from_wire),
            }),
            (WireMessage::FixtureChange(m), Some(header)) => {
                FeedMessage::FixtureChange(FixtureChange {
                    header,
                    change_type: specified(m.change_type, m.change_type_specified)
                        .map(FixtureChangeType::from_wire),
                    start_time: to_datetime(specified(m.start_time, m.start_time_specified)),
                    next_live_time: to_datetime(specified(
                        m.next_live_time,
                        m.next_live_time_specified,
                    )),
                })
            }
            (WireMessage::BetSettlement(m), Some(header)) => {
                FeedMessage::BetSettlement(BetSettlement {
                    header,
                    certainty: SettlementCertainty::from_wire(m.certainty),
                    markets: self
                        .settlement_markets(m.markets.as_deref(), producer_id, languages)
                        .await,
                })
            }
            (WireMessage::BetCancel(m), Some(header)) => FeedMessage::BetCancel(BetCancel {
                header,
                start_time: to_datetime(specified(m.start_time, m.start_time_specified)),
                end_time: to_datetime(specified(m.end_time, m.end_time_specified)),
                superceded_by: m.superceded_by.clone().filter(|s| !s.trim().is_empty()),
                markets: self
                    .cancelled_markets(m.markets.as_deref(), producer_id, languages)
                    .await,
            }),
            (WireMessage::RollbackBetSettlement(m), Some(header)) => {
                FeedMessage::RollbackBetSettlement(RollbackBetSettlement {
                    header,
                    markets: self
                        .cancelled_markets(m.markets.as_deref(), producer_id, languages)
                        .await,
                })
            }
            (WireMessage::RollbackBetCancel(m), Some(header)) => {
                FeedMessage::RollbackBetCancel(RollbackBetCancel {
                    header,
                    start_time: to_datetime(specified(m.start_time, m.start_time_specified)),
                    end_time: to_datetime(specified(m.end_time, m.end_time_specified)),
                    markets: self
                        .cancelled_markets(m.markets.as_deref(), producer_id, languages)
                        .await,
                })
            }
            (WireMessage::Alive(m), _) => FeedMessage::Alive(Alive {
                producer: self.producers.get(m.product),
                timestamp: m.timestamp,
                subscribed: m.subscribed == 1,
            }),
            (WireMessage::SnapshotComplete(m), _) => FeedMessage::SnapshotComplete(SnapshotComplete {
                producer: self.producers.get(m.product),
                timestamp: m.timestamp,
                request_id: m.request_id,
            }),
            (other, None) => {
                return Err(FeedError::InvalidFormat(format!(
                    "{} carries no event id",
                    other.message_type()
                )))
            }
        };

        Ok(mapped)
    }

    fn header(
        &self,
        message: &WireMessage,
        event_id: &str,
        languages: &[Language],
        requested_kind: Option<SportEventKind>,
        sport_id: Option<&Urn>,
    ) -> Result<EventHeader> {
        let id = Urn::parse(event_id)?;
        let actual = SportEventKind::from_urn(&id);
        if let Some(requested) = requested_kind {
            if !requested.accepts(actual) {
                return Err(FeedError::IncompatibleEventKind {
                    event_id: event_id.to_string(),
                    requested,
                    actual,
                });
            }
        }

        Ok(EventHeader {
            producer: self.producers.get(message.product()),
            timestamp: message.timestamp(),
            request_id: message.request_id(),
            event: self.events.build(actual, &id, sport_id, languages),
        })
    }

    /// Resolve a market; `None` when its specifier string is malformed
    async fn market(
        &self,
        id: i32,
        raw_specifiers: Option<&str>,
        extended_specifiers: Option<&str>,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<ResolvedMarket> {
        let specifiers = match raw_specifiers {
            Some(raw) => match parse_specifiers(raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!("Dropping market {} with specifiers '{}': {}", id, raw, e);
                    return None;
                }
            },
            None => Specifiers::new(),
        };

        let resolved = self
            .provider
            .resolve(id, &specifiers, producer_id, languages)
            .await;

        let names: LocalizedNames = languages
            .iter()
            .filter_map(|language| {
                let template = resolved.name_template(language)?;
                Some((language.clone(), expand_name(template, &specifiers)))
            })
            .collect();

        let mapping = resolved.mapping.as_ref().map(|mapping| MarketMappingInfo {
            producer_id: mapping.producer_id,
            market_id: mapping.market_id.clone(),
            market_type_id: mapping.market_type_id,
            market_sub_type_id: mapping.market_sub_type_id,
            sov_template: mapping.sov_template.clone(),
        });

        Some(ResolvedMarket {
            market: Market {
                id,
                specifiers: specifiers.clone(),
                extended_specifiers: extended_specifiers.map(str::to_string),
                names,
                mapping,
            },
            resolved,
            specifiers,
        })
    }

    async fn odds_markets(
        &self,
        markets: Option<&[WireOddsMarket]>,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<Vec<MarketWithOdds>> {
        let markets = markets?;
        let mapped = join_all(
            markets
                .iter()
                .map(|m| self.odds_market(m, producer_id, languages)),
        )
        .await;
        Some(mapped.into_iter().flatten().collect())
    }

    async fn odds_market(
        &self,
        wire: &WireOddsMarket,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<MarketWithOdds> {
        let resolved = self
            .market(
                wire.id,
                wire.specifiers.as_deref(),
                wire.extended_specifiers.as_deref(),
                producer_id,
                languages,
            )
            .await?;

        let outcomes = wire.outcomes.as_ref().map(|outcomes| {
            outcomes
                .iter()
                .map(|o| odds_outcome(&resolved, o, languages))
                .collect()
        });

        Some(MarketWithOdds {
            status: MarketStatus::from_wire(wire.status),
            cashout_status: specified(wire.cashout_status, wire.cashout_status_specified)
                .map(CashoutStatus::from_wire),
            is_favourite: specified(wire.favourite, wire.favourite_specified).map(|f| f == 1),
            outcomes,
            market: resolved.market,
        })
    }

    async fn settlement_markets(
        &self,
        markets: Option<&[WireSettlementMarket]>,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<Vec<MarketWithSettlement>> {
        let markets = markets?;
        let mapped = join_all(
            markets
                .iter()
                .map(|m| self.settlement_market(m, producer_id, languages)),
        )
        .await;
        Some(mapped.into_iter().flatten().collect())
    }

    async fn settlement_market(
        &self,
        wire: &WireSettlementMarket,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<MarketWithSettlement> {
        let resolved = self
            .market(wire.id, wire.specifiers.as_deref(), None, producer_id, languages)
            .await?;

        let outcomes = wire.outcomes.as_ref().map(|outcomes| {
            outcomes
                .iter()
                .map(|o| settlement_outcome(&resolved, o, languages))
                .collect()
        });

        Some(MarketWithSettlement {
            void_reason: specified(wire.void_reason, wire.void_reason_specified),
            outcomes,
            market: resolved.market,
        })
    }

    async fn cancelled_markets(
        &self,
        markets: Option<&[WireMarketRef]>,
        producer_id: i32,
        languages: &[Language],
    ) -> Option<Vec<MarketCancel>> {
        let markets = markets?;
        let mapped = join_all(markets.iter().map(|wire| async move {
            let resolved = self
                .market(wire.id, wire.specifiers.as_deref(), None, producer_id, languages)
                .await?;
            Some(MarketCancel {
                market: resolved.market,
                void_reason: specified(wire.void_reason, wire.void_reason_specified),
            })
        }))
        .await;
        Some(mapped.into_iter().flatten().collect())
    }
}

fn odds_outcome(market: &ResolvedMarket, wire: &WireOddsOutcome, languages: &[Language]) -> OutcomeOdds {
    let values = OddsValues {
        outcome: market.outcome(&wire.id, languages),
        odds: specified(wire.odds, wire.odds_specified),
        probability: specified(wire.probabilities, wire.probabilities_specified),
        active: specified(wire.active, wire.active_specified).and_then(outcome_active_from_wire),
    };

    match specified(wire.team, wire.team_specified).and_then(HomeAway::from_wire) {
        Some(team) => OutcomeOdds::Player { values, team },
        None => OutcomeOdds::Plain(values),
    }
}

fn settlement_outcome(
    market: &ResolvedMarket,
    wire: &WireSettlementOutcome,
    languages: &[Language],
) -> OutcomeSettlement {
    OutcomeSettlement {
        outcome: market.outcome(&wire.id, languages),
        result: OutcomeResult::from_wire(wire.result),
        void_factor: specified(wire.void_factor, wire.void_factor_specified),
        dead_heat_factor: specified(wire.dead_heat_factor, wire.dead_heat_factor_specified),
    }
}
