//! Domain types: identifiers, value domains, sport events and mapped messages

pub mod enums;
pub mod events;
pub mod language;
pub mod market;
pub mod producer;
pub mod specifiers;
pub mod sport_event;
pub mod urn;

pub use enums::{
    outcome_active_from_wire, CashoutStatus, FixtureChangeType, HomeAway, MarketStatus,
    NamedValue, OddsChangeReason, OutcomeResult, SettlementCertainty,
};
pub use events::{
    Alive, BetCancel, BetSettlement, BetStop, CashoutProbabilities, EventHeader, FeedMessage,
    FixtureChange, OddsChange, RollbackBetCancel, RollbackBetSettlement, SnapshotComplete,
};
pub use language::Language;
pub use market::{
    LocalizedNames, Market, MarketCancel, MarketMappingInfo, MarketWithOdds,
    MarketWithSettlement, OddsValues, Outcome, OutcomeMappingInfo, OutcomeOdds,
    OutcomeSettlement,
};
pub use producer::{Producer, ProducerRegistry, StaticProducerRegistry};
pub use specifiers::{format_specifiers, parse_specifiers, Specifiers};
pub use sport_event::{
    DefaultSportEventFactory, SportEvent, SportEventFactory, SportEventHandle, SportEventKind,
};
pub use urn::Urn;
