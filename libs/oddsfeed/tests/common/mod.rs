//! Common test utilities for oddsfeed integration tests
//!
//! In-memory catalog source with fetch counters plus catalog fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use oddsfeed::cache::catalog::{
    CatalogError, CatalogSource, MappingDto, MarketDescriptionDto, OutcomeDto,
    OutcomeMappingDto, Result, SpecifierDto, VariantDescriptionDto,
};
use oddsfeed::cache::{CacheInvalidationHub, CacheSettings, MarketCacheProvider, RefreshSchedule};
use oddsfeed::domain::Language;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

pub fn en() -> Language {
    Language::new("en")
}

pub fn de() -> Language {
    Language::new("de")
}

/// Catalog served from memory
#[derive(Default)]
pub struct MockCatalog {
    markets: Mutex<HashMap<Language, Vec<MarketDescriptionDto>>>,
    variants: Mutex<HashMap<Language, Vec<VariantDescriptionDto>>>,
    single: Mutex<HashMap<(i32, String, Language), MarketDescriptionDto>>,
    delay: Option<Duration>,
    fail_bulk: AtomicBool,
    pub market_fetches: AtomicUsize,
    pub variant_fetches: AtomicUsize,
    pub single_fetches: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch sleeps for `delay` first
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Bulk fetches fail with an API error
    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_bulk.store(failing, Ordering::SeqCst);
    }

    /// Replace what later bulk fetches of `language` return
    pub fn set_markets(&self, language: Language, markets: Vec<MarketDescriptionDto>) {
        self.markets.lock().insert(language, markets);
    }

    pub fn with_markets(self, language: Language, markets: Vec<MarketDescriptionDto>) -> Self {
        self.set_markets(language, markets);
        self
    }

    pub fn with_variants(self, language: Language, variants: Vec<VariantDescriptionDto>) -> Self {
        self.variants.lock().insert(language, variants);
        self
    }

    pub fn with_single(
        self,
        market_id: i32,
        variant: &str,
        language: Language,
        description: MarketDescriptionDto,
    ) -> Self {
        self.single
            .lock()
            .insert((market_id, variant.to_string(), language), description);
        self
    }

    pub fn market_fetch_count(&self) -> usize {
        self.market_fetches.load(Ordering::SeqCst)
    }

    pub fn variant_fetch_count(&self) -> usize {
        self.variant_fetches.load(Ordering::SeqCst)
    }

    pub fn single_fetch_count(&self) -> usize {
        self.single_fetches.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn market_descriptions(&self, language: &Language) -> Result<Vec<MarketDescriptionDto>> {
        self.market_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_bulk.load(Ordering::SeqCst) {
            return Err(CatalogError::ApiError("catalog unavailable".to_string()));
        }
        Ok(self.markets.lock().get(language).cloned().unwrap_or_default())
    }

    async fn variant_descriptions(&self, language: &Language) -> Result<Vec<VariantDescriptionDto>> {
        self.variant_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_bulk.load(Ordering::SeqCst) {
            return Err(CatalogError::ApiError("catalog unavailable".to_string()));
        }
        Ok(self.variants.lock().get(language).cloned().unwrap_or_default())
    }

    async fn market_variant_description(
        &self,
        market_id: i32,
        variant: &str,
        language: &Language,
    ) -> Result<Option<MarketDescriptionDto>> {
        self.single_fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Ok(self
            .single
            .lock()
            .get(&(market_id, variant.to_string(), language.clone()))
            .cloned())
    }
}

/// Provider over `catalog` with timers far in the future
pub fn provider(catalog: Arc<MockCatalog>, languages: Vec<Language>) -> Arc<MarketCacheProvider> {
    let settings = CacheSettings {
        invariant: RefreshSchedule::new(Duration::from_secs(3600), Duration::from_secs(3600)),
        variant_list: RefreshSchedule::new(Duration::from_secs(3600), Duration::from_secs(3600)),
        single_variant_ttl: Duration::from_secs(60),
    };
    let hub = CacheInvalidationHub::new();
    Arc::new(MarketCacheProvider::new(catalog, languages, settings, &hub))
}

pub mod fixtures {
    //! Catalog payloads modelled on real market descriptions

    use super::*;

    pub fn specifier(name: &str, kind: &str) -> SpecifierDto {
        SpecifierDto {
            name: name.to_string(),
            kind: kind.to_string(),
            description: None,
        }
    }

    pub fn outcome(id: &str, name: &str) -> OutcomeDto {
        OutcomeDto {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    pub fn mapping(producers: &str, market_id: &str, valid_for: Option<&str>) -> MappingDto {
        let product_id = producers
            .split('|')
            .next()
            .and_then(|id| id.parse().ok())
            .unwrap_or(1);
        MappingDto {
            product_id,
            product_ids: producers.to_string(),
            sport_id: "all".to_string(),
            market_id: market_id.to_string(),
            sov_template: None,
            valid_for: valid_for.map(str::to_string),
            outcomes: None,
        }
    }

    pub fn market(id: i32, name: &str) -> MarketDescriptionDto {
        MarketDescriptionDto {
            id,
            name: name.to_string(),
            description: None,
            variant: None,
            outcome_type: None,
            groups: None,
            specifiers: None,
            outcomes: None,
            attributes: None,
            mappings: None,
        }
    }

    /// 1x2 with outcome mappings, producers 1 and 3
    pub fn match_winner(name: &str, home: &str) -> MarketDescriptionDto {
        let mut mapping = mapping("1|3", "1", None);
        mapping.outcomes = Some(vec![
            OutcomeMappingDto {
                outcome_id: "1".to_string(),
                product_outcome_id: "1".to_string(),
                product_outcome_name: Some("1".to_string()),
            },
            OutcomeMappingDto {
                outcome_id: "3".to_string(),
                product_outcome_id: "2".to_string(),
                product_outcome_name: Some("X".to_string()),
            },
        ]);
        MarketDescriptionDto {
            groups: Some("all|score|regular_play".to_string()),
            outcomes: Some(vec![
                outcome("1", home),
                outcome("2", "draw"),
                outcome("3", "{$competitor2}"),
            ]),
            mappings: Some(vec![mapping]),
            ..market(1, name)
        }
    }

    /// Total goals with a decimal `total` specifier
    pub fn total() -> MarketDescriptionDto {
        MarketDescriptionDto {
            specifiers: Some(vec![specifier("total", "decimal")]),
            outcomes: Some(vec![
                outcome("12", "over {total}"),
                outcome("13", "under {total}"),
            ]),
            mappings: Some(vec![mapping("1|3", "56", None)]),
            ..market(18, "Total")
        }
    }

    /// Correct score whose outcomes come from the shared variant list
    pub fn correct_score() -> MarketDescriptionDto {
        MarketDescriptionDto {
            specifiers: Some(vec![specifier("variant", "variable_text")]),
            ..market(374, "{!setnr} set - correct score")
        }
    }

    /// Best-of-12 correct score variant: 13 outcomes, vendor market 374:455
    pub fn correct_score_bestof_12() -> VariantDescriptionDto {
        let scores = [
            "7:0", "7:1", "7:2", "7:3", "7:4", "7:5", "0:7", "1:7", "2:7", "3:7", "4:7", "5:7",
            "6:6",
        ];
        let outcomes = scores
            .iter()
            .enumerate()
            .map(|(i, score)| outcome(&format!("sr:correct_score:bestof:12:{}", i + 1), score))
            .collect();
        VariantDescriptionDto {
            id: "sr:correct_score:bestof:12".to_string(),
            outcomes: Some(outcomes),
            mappings: Some(vec![mapping("1", "374:455", None)]),
        }
    }

    /// Free text championship market resolved per occurrence
    pub fn championship_free_text() -> MarketDescriptionDto {
        MarketDescriptionDto {
            outcome_type: Some("free_text".to_string()),
            specifiers: Some(vec![specifier("variant", "variable_text")]),
            ..market(534, "Championship free text market")
        }
    }

    pub const FREE_TEXT_VARIANT: &str = "pre:markettext:168883";

    /// Concrete description of market 534 for [`FREE_TEXT_VARIANT`]
    pub fn championship_occurrence() -> MarketDescriptionDto {
        MarketDescriptionDto {
            outcome_type: Some("free_text".to_string()),
            specifiers: Some(vec![specifier("variant", "variable_text")]),
            outcomes: Some(vec![
                outcome("pre:outcometext:1", "Competitor A"),
                outcome("pre:outcometext:2", "Competitor B"),
            ]),
            mappings: Some(vec![mapping("3", "534", None)]),
            ..market(534, "Winner 2026")
        }
    }

    /// Top finish market with a `winners=3` constrained mapping and a fallback
    pub fn top_finish() -> MarketDescriptionDto {
        MarketDescriptionDto {
            specifiers: Some(vec![specifier("winners", "integer")]),
            mappings: Some(vec![
                mapping("3", "536:3", Some("winners=3")),
                mapping("3", "536", None),
            ]),
            ..market(536, "Top {winners} finish")
        }
    }

    /// Catalog with every fixture above in English
    pub fn catalog() -> MockCatalog {
        MockCatalog::new()
            .with_markets(
                en(),
                vec![
                    match_winner("1x2", "{$competitor1}"),
                    total(),
                    correct_score(),
                    championship_free_text(),
                    top_finish(),
                ],
            )
            .with_markets(de(), vec![match_winner("1x2 (DE)", "{$competitor1}")])
            .with_variants(en(), vec![correct_score_bestof_12()])
            .with_single(534, FREE_TEXT_VARIANT, en(), championship_occurrence())
    }
}
