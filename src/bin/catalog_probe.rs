//! Resolve market descriptions against the live catalog
//!
//! Usage: catalog_probe [--producer=N] <market_id>[@specifiers]...
//!
//! Example: catalog_probe 1 18@total=2.5 374@variant=sr:correct_score:bestof:12

use anyhow::{bail, Context, Result};
use oddsfeed::cache::{CacheInvalidationHub, MarketCacheProvider};
use oddsfeed::domain::{parse_specifiers, Specifiers};
use oddsfeed::mapping::expand_name;
use oddsfeed::{init_tracing, FeedConfig, HttpCatalogClient};
use oddsfeed_client::bin_common::{load_config_from_env, parse_args, BinaryRunner, ConfigType, RunConfig};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_PRODUCER: i32 = 1;

struct Probe {
    market_id: i32,
    specifiers: Specifiers,
}

fn parse_probe(arg: &str) -> Result<Probe> {
    let (id, raw_specifiers) = match arg.split_once('@') {
        Some((id, specifiers)) => (id, Some(specifiers)),
        None => (arg, None),
    };
    let market_id = id
        .parse()
        .with_context(|| format!("'{}' is not a market id", id))?;
    let specifiers = match raw_specifiers {
        Some(raw) => parse_specifiers(raw)?,
        None => Specifiers::new(),
    };
    Ok(Probe {
        market_id,
        specifiers,
    })
}

struct CatalogProbe {
    run: RunConfig,
    config: FeedConfig,
    provider: MarketCacheProvider,
    producer_id: i32,
    probes: Vec<Probe>,
}

impl BinaryRunner for CatalogProbe {
    async fn run(&mut self) -> Result<String> {
        self.provider.warm_up(&self.config.languages).await;
        info!(
            "Loaded {} invariant markets",
            self.provider.invariant().len()
        );

        let mut resolved_count = 0;
        for probe in &self.probes {
            let resolved = self
                .provider
                .resolve(
                    probe.market_id,
                    &probe.specifiers,
                    self.producer_id,
                    &self.config.languages,
                )
                .await;

            if resolved.description.is_none() {
                warn!("Market {}: no description", probe.market_id);
                continue;
            }
            if resolved.is_degraded() {
                warn!("Market {}: variant outcomes unavailable", probe.market_id);
            }
            resolved_count += 1;

            info!("Market {} ({:?})", probe.market_id, resolved.source);
            for language in &self.config.languages {
                if let Some(template) = resolved.name_template(language) {
                    info!("  [{}] {}", language, expand_name(template, &probe.specifiers));
                }
            }
            match &resolved.mapping {
                Some(mapping) => info!(
                    "  Mapping for producer {}: {} (sov: {:?})",
                    self.producer_id, mapping.market_id, mapping.sov_template
                ),
                None => info!("  No mapping for producer {}", self.producer_id),
            }
            for outcome in &resolved.outcomes {
                let name = self
                    .config
                    .languages
                    .first()
                    .and_then(|language| outcome.name(language))
                    .map(|template| expand_name(template, &probe.specifiers))
                    .unwrap_or_default();
                info!("    {} {}", outcome.id, name);
            }
        }

        Ok(format!(
            "Resolved {}/{} markets",
            resolved_count,
            self.probes.len()
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

    let mut producer_id = DEFAULT_PRODUCER;
    let mut probes = Vec::new();
    for arg in parse_args() {
        match arg.strip_prefix("--producer=") {
            Some(id) => producer_id = id.parse().context("invalid --producer")?,
            None => probes.push(parse_probe(&arg)?),
        }
    }
    if probes.is_empty() {
        bail!("usage: catalog_probe [--producer=N] <market_id>[@specifiers]...");
    }

    let client = HttpCatalogClient::new(
        config.catalog.base_url.clone(),
        config.access_token.clone(),
        config.timeout(),
    )?;
    let hub = CacheInvalidationHub::new();
    let provider = MarketCacheProvider::new(
        Arc::new(client),
        config.languages.clone(),
        config.cache.settings(),
        &hub,
    );

    let mut app = CatalogProbe {
        run: RunConfig::new("Catalog probe"),
        config,
        provider,
        producer_id,
        probes,
    };
    app.execute().await
}
