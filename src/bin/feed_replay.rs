//! Replay recorded deliveries through the feed pipeline
//!
//! Usage: feed_replay <deliveries.jsonl>
//!
//! Each line is `{"routing_key": "...", "payload": ...}` where `payload` is
//! either the message object itself or its JSON text.

use anyhow::{bail, Context, Result};
use oddsfeed::cache::{CacheInvalidationHub, MarketCacheProvider};
use oddsfeed::domain::{DefaultSportEventFactory, StaticProducerRegistry};
use oddsfeed::pipeline::{spawn_handler, HandlerResult, PipelineEvent};
use oddsfeed::routing::generate_keys;
use oddsfeed::validation::ValidationResult;
use oddsfeed::{
    init_tracing, FeedConfig, FeedMessageMapper, FeedMessageValidator, FeedPipeline,
    HttpCatalogClient, JsonWireDeserializer, ShutdownManager,
};
use oddsfeed_client::bin_common::{load_config_from_env, parse_args, BinaryRunner, ConfigType, RunConfig};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// One recorded delivery
#[derive(Debug, Deserialize)]
struct Delivery {
    routing_key: String,
    #[serde(default)]
    payload: Value,
}

impl Delivery {
    fn payload_bytes(&self) -> Result<Option<Vec<u8>>> {
        Ok(match &self.payload {
            Value::Null => None,
            Value::String(text) => Some(text.clone().into_bytes()),
            other => Some(serde_json::to_vec(other)?),
        })
    }
}

#[derive(Debug, Default)]
struct ReplayStats {
    delivered: usize,
    mapped: usize,
    with_problems: usize,
    undecodable: usize,
    unusable: usize,
}

impl ReplayStats {
    fn record(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Message { validation, .. } => {
                self.mapped += 1;
                if *validation == ValidationResult::ProblemsDetected {
                    self.with_problems += 1;
                }
            }
            PipelineEvent::DecodeFailed { .. } => self.undecodable += 1,
            PipelineEvent::Unusable { .. } => self.unusable += 1,
        }
    }
}

fn log_event(event: PipelineEvent) -> HandlerResult {
    match event {
        PipelineEvent::Message {
            routing_key,
            sport_id,
            validation,
            message,
        } => {
            let event_id = message
                .event()
                .map(|event| event.id().to_string())
                .unwrap_or_else(|| "-".to_string());
            info!(
                "{} {} event={} sport={} ({:?})",
                routing_key,
                message.message_type(),
                event_id,
                sport_id.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                validation
            );
            debug!("{:?}", message);
        }
        PipelineEvent::DecodeFailed { routing_key, reason } => {
            warn!("{} undecodable: {}", routing_key, reason);
        }
        PipelineEvent::Unusable {
            routing_key,
            message_type,
            event_id,
            reason,
        } => {
            warn!(
                "{} {} event={} unusable: {}",
                routing_key,
                message_type,
                event_id.as_deref().unwrap_or("-"),
                reason
            );
        }
    }
    Ok(())
}

struct FeedReplay {
    run: RunConfig,
    input: PathBuf,
    pipeline: FeedPipeline,
    shutdown: ShutdownManager,
}

impl BinaryRunner for FeedReplay {
    async fn run(&mut self) -> Result<String> {
        let handler = spawn_handler(
            "replay-log",
            self.pipeline.subscribe(),
            log_event,
            self.shutdown.flag(),
        )?;

        let file = tokio::fs::File::open(&self.input)
            .await
            .with_context(|| format!("opening {}", self.input.display()))?;
        let mut lines = BufReader::new(file).lines();
        let mut stats = ReplayStats::default();
        let mut line_number = 0;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            if !self.shutdown.is_running() {
                info!("Replay interrupted at line {}", line_number);
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let delivery: Delivery = match serde_json::from_str(&line) {
                Ok(delivery) => delivery,
                Err(e) => {
                    warn!("Skipping line {}: {}", line_number, e);
                    continue;
                }
            };
            let payload = delivery.payload_bytes()?;

            stats.delivered += 1;
            if let Some(event) = self
                .pipeline
                .process(&delivery.routing_key, payload.as_deref())
                .await
            {
                stats.record(&event);
            }

            if stats.delivered % self.run.progress_every == 0 {
                info!("Replayed {} deliveries", stats.delivered);
            }
        }

        // Handler drains its queue until the flag drops
        self.shutdown.trigger();
        if handler.join().is_err() {
            warn!("Log handler thread panicked");
        }

        Ok(format!(
            "Deliveries: {} | mapped: {} ({} with problems) | undecodable: {} | unusable: {}",
            stats.delivered, stats.mapped, stats.with_problems, stats.undecodable, stats.unusable
        ))
    }

    fn config(&self) -> &RunConfig {
        &self.run
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Feed);
    let config = FeedConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    init_tracing(&config.log_level);
    config.log();

    let Some(input) = parse_args().into_iter().next() else {
        bail!("usage: feed_replay <deliveries.jsonl>");
    };

    for binding in generate_keys(&config.interests)? {
        info!("Binding: {}", binding);
    }

    let client = HttpCatalogClient::new(
        config.catalog.base_url.clone(),
        config.access_token.clone(),
        config.timeout(),
    )?;
    let hub = CacheInvalidationHub::new();
    let provider = Arc::new(MarketCacheProvider::new(
        Arc::new(client),
        config.languages.clone(),
        config.cache.settings(),
        &hub,
    ));
    let _refresh = provider.spawn_refresh();

    let mapper = FeedMessageMapper::new(
        Arc::clone(&provider),
        Arc::new(StaticProducerRegistry::default()),
        Arc::new(DefaultSportEventFactory),
    );
    let pipeline = FeedPipeline::new(
        Arc::new(JsonWireDeserializer),
        FeedMessageValidator::new(provider),
        mapper,
        config.languages.clone(),
    );

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let mut app = FeedReplay {
        run: RunConfig::new("Feed replay").with_progress_every(500),
        input: input.into(),
        pipeline,
        shutdown,
    };
    app.execute().await
}
