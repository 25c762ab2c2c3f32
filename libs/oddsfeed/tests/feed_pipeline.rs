//! End-to-end delivery processing: decode, validate, map, publish

mod common;

use common::{de, en, fixtures, provider};
use oddsfeed::domain::{
    DefaultSportEventFactory, FeedMessage, FixtureChangeType, HomeAway, OutcomeOdds,
    SportEventKind, StaticProducerRegistry, Urn,
};
use oddsfeed::mapping::FeedMessageMapper;
use oddsfeed::messages::JsonWireDeserializer;
use oddsfeed::pipeline::{spawn_handler, FeedPipeline, HandlerResult, PipelineEvent};
use oddsfeed::routing::MessageType;
use oddsfeed::validation::{FeedMessageValidator, ValidationResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ODDS_KEY: &str = "hi.-.live.odds_change.6.sr:match.9536715";

fn pipeline() -> FeedPipeline {
    let languages = vec![en(), de()];
    let provider = provider(Arc::new(fixtures::catalog()), languages.clone());
    let mapper = FeedMessageMapper::new(
        provider.clone(),
        Arc::new(StaticProducerRegistry::default()),
        Arc::new(DefaultSportEventFactory),
    );
    FeedPipeline::new(
        Arc::new(JsonWireDeserializer),
        FeedMessageValidator::new(provider),
        mapper,
        languages,
    )
}

fn odds_change_payload() -> &'static [u8] {
    br#"{"odds_change":{
        "product":1,
        "event_id":"sr:match:9536715",
        "timestamp":1700000000000,
        "request_id":42,
        "request_id_specified":true,
        "markets":[
            {"id":1,"status":1,"favourite":1,"favourite_specified":true,"outcomes":[
                {"id":"1","odds":1.85,"odds_specified":true,"active":1,"active_specified":true,"team":1,"team_specified":true},
                {"id":"3","odds":4.2,"odds_specified":true}
            ]},
            {"id":18,"specifiers":"total=2.5","status":-1},
            {"id":18,"specifiers":"total=","status":1,"outcomes":[]}
        ]
    }}"#
}

fn expect_message(event: Option<PipelineEvent>) -> (Option<Urn>, ValidationResult, FeedMessage) {
    match event {
        Some(PipelineEvent::Message {
            sport_id,
            validation,
            message,
            ..
        }) => (sport_id, validation, message),
        other => panic!("expected a mapped message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_odds_change_is_mapped_with_names() {
    let pipeline = pipeline();
    let (sport_id, validation, message) =
        expect_message(pipeline.process(ODDS_KEY, Some(odds_change_payload())).await);

    verbose_println!("{:#?}", message);
    assert_eq!(sport_id, Some(Urn::sport(6)));
    // Malformed specifiers on the last market
    assert_eq!(validation, ValidationResult::ProblemsDetected);

    let FeedMessage::OddsChange(odds) = message else {
        panic!("expected odds change");
    };
    assert_eq!(odds.header.producer.id, 1);
    assert_eq!(odds.header.request_id, Some(42));
    assert_eq!(odds.header.event.kind(), SportEventKind::Match);
    assert!(odds.change_reason.is_none());

    let markets = odds.markets.unwrap();
    assert_eq!(markets.len(), 2, "market with malformed specifiers is dropped");

    let winner = &markets[0];
    assert_eq!(winner.market.name(&en()), Some("1x2"));
    assert_eq!(winner.market.name(&de()), Some("1x2 (DE)"));
    assert_eq!(winner.is_favourite, Some(true));
    assert!(winner.cashout_status.is_none());
    assert_eq!(winner.market.mapping.as_ref().unwrap().market_id, "1");

    let outcomes = winner.outcomes.as_ref().unwrap();
    match &outcomes[0] {
        OutcomeOdds::Player { values, team } => {
            assert_eq!(*team, HomeAway::Home);
            assert_eq!(values.odds, Some(1.85));
            assert_eq!(values.active, Some(true));
            assert_eq!(values.outcome.name(&en()), Some("{$competitor1}"));
            assert_eq!(
                values.outcome.mapping.as_ref().unwrap().product_outcome_id,
                "1"
            );
        }
        other => panic!("expected competitor outcome, got {:?}", other),
    }
    match &outcomes[1] {
        OutcomeOdds::Plain(values) => {
            assert!(values.active.is_none());
            assert!(values.probability.is_none());
        }
        other => panic!("expected plain outcome, got {:?}", other),
    }

    let total = &markets[1];
    assert_eq!(total.market.name(&en()), Some("Total"));
    assert!(total.outcomes.is_none());
}

#[tokio::test]
async fn test_out_of_domain_change_type_maps_to_other() {
    let pipeline = pipeline();
    let payload = br#"{"fixture_change":{"product":3,"event_id":"sr:match:1","timestamp":1,"change_type":100,"change_type_specified":true}}"#;

    let (_, validation, message) = expect_message(
        pipeline
            .process("-.pre.-.fixture_change.1.sr:match.1.-", Some(payload.as_slice()))
            .await,
    );

    assert_eq!(validation, ValidationResult::ProblemsDetected);
    let FeedMessage::FixtureChange(change) = message else {
        panic!("expected fixture change");
    };
    assert_eq!(change.change_type, Some(FixtureChangeType::Other(100)));
    assert!(change.start_time.is_none());
}

#[tokio::test]
async fn test_cancel_without_markets_is_unusable() {
    let pipeline = pipeline();
    let payload = br#"{"bet_cancel":{"product":1,"event_id":"sr:match:1","timestamp":1}}"#;

    match pipeline
        .process("-.-.live.bet_cancel.1.sr:match.1.-", Some(payload.as_slice()))
        .await
    {
        Some(PipelineEvent::Unusable {
            message_type,
            event_id,
            ..
        }) => {
            assert_eq!(message_type, MessageType::BetCancel);
            assert_eq!(event_id.as_deref(), Some("sr:match:1"));
        }
        other => panic!("expected unusable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_and_null_collections_stay_distinct() {
    let pipeline = pipeline();
    let empty = br#"{"rollback_bet_settlement":{"product":1,"event_id":"sr:match:1","timestamp":1,"markets":[]}}"#;
    let (_, validation, message) = expect_message(
        pipeline
            .process("-.-.live.rollback_bet_settlement.1.sr:match.1.-", Some(empty.as_slice()))
            .await,
    );
    assert_eq!(validation, ValidationResult::Success);
    let FeedMessage::RollbackBetSettlement(rollback) = message else {
        panic!("expected rollback");
    };
    assert_eq!(rollback.markets, Some(Vec::new()));

    let null = br#"{"odds_change":{"product":1,"event_id":"sr:match:1","timestamp":1}}"#;
    let (_, _, message) = expect_message(pipeline.process(ODDS_KEY, Some(null.as_slice())).await);
    let FeedMessage::OddsChange(odds) = message else {
        panic!("expected odds change");
    };
    assert!(odds.markets.is_none());
}

#[tokio::test]
async fn test_incompatible_event_kind_is_unusable() {
    let pipeline = pipeline().with_event_kind(SportEventKind::Match);
    let payload = br#"{"bet_stop":{"product":1,"event_id":"sr:stage:7","timestamp":1,"groups":"all"}}"#;

    match pipeline
        .process("-.-.live.bet_stop.5.sr:stage.7.-", Some(payload.as_slice()))
        .await
    {
        Some(PipelineEvent::Unusable { reason, .. }) => assert!(reason.contains("sr:stage:7")),
        other => panic!("expected unusable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_decode_failure_and_empty_payload() {
    let pipeline = pipeline();

    assert!(pipeline.process(ODDS_KEY, None).await.is_none());
    assert!(pipeline.process(ODDS_KEY, Some(b"".as_slice())).await.is_none());

    match pipeline.process(ODDS_KEY, Some(b"{not json".as_slice())).await {
        Some(PipelineEvent::DecodeFailed { routing_key, .. }) => assert_eq!(routing_key, ODDS_KEY),
        other => panic!("expected decode failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparsable_routing_key_still_maps() {
    let pipeline = pipeline();
    let payload = br#"{"alive":{"product":3,"timestamp":5,"subscribed":1}}"#;

    let (sport_id, validation, message) =
        expect_message(pipeline.process("garbage", Some(payload.as_slice())).await);
    assert!(sport_id.is_none());
    assert_eq!(validation, ValidationResult::Success);
    match message {
        FeedMessage::Alive(alive) => {
            assert_eq!(alive.producer.name, "Ctrl");
            assert!(alive.subscribed);
        }
        other => panic!("expected alive, got {:?}", other),
    }
}

#[tokio::test]
async fn test_subscribers_receive_events_on_handler_thread() {
    let pipeline = pipeline();
    let receiver = pipeline.subscribe();
    let running = Arc::new(AtomicBool::new(true));
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let handle = spawn_handler(
        "test-handler",
        receiver,
        move |event: PipelineEvent| -> HandlerResult {
            sink.lock().push(event.routing_key().to_string());
            Ok(())
        },
        Arc::clone(&running),
    )
    .unwrap();

    pipeline.process(ODDS_KEY, Some(odds_change_payload())).await;
    pipeline.process("garbage", Some(b"{".as_slice())).await;

    for _ in 0..100 {
        if seen.lock().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    running.store(false, Ordering::Release);
    handle.join().unwrap();

    assert_eq!(*seen.lock(), vec![ODDS_KEY.to_string(), "garbage".to_string()]);
}
