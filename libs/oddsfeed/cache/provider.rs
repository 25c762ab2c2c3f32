//! Market description resolution across the three description caches

use super::bulk::RefreshSchedule;
use super::catalog::CatalogSource;
use super::descriptions::{
    MarketDescription, MarketMapping, OutcomeDescription, OutcomeMapping, SpecifierDescription,
    VariantReference, VARIANT_SPECIFIER,
};
use super::hub::CacheInvalidationHub;
use super::invariant::InvariantMarketCache;
use super::mapping::select_mapping;
use super::single_variant::SingleVariantCache;
use super::timer::RefreshHandle;
use super::variant_list::VariantListCache;
use crate::domain::{Language, Specifiers};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache tier the outcomes of a resolved market came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    Invariant,
    VariantList,
    SingleVariant,
    /// Names from the invariant entry, but the variant's outcomes are unknown
    VariantMissing,
    /// Nothing could be resolved; only raw ids are available
    Unresolved,
}

/// Everything known about one market occurrence
#[derive(Debug, Clone)]
pub struct ResolvedDescription {
    pub market_id: i32,
    pub description: Option<Arc<MarketDescription>>,
    pub outcomes: Vec<OutcomeDescription>,
    pub mapping: Option<MarketMapping>,
    pub source: DescriptionSource,
}

impl ResolvedDescription {
    fn unresolved(market_id: i32) -> Self {
        Self {
            market_id,
            description: None,
            outcomes: Vec::new(),
            mapping: None,
            source: DescriptionSource::Unresolved,
        }
    }

    /// Whether outcomes are only known by their raw ids
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.source,
            DescriptionSource::VariantMissing | DescriptionSource::Unresolved
        )
    }

    /// Name template of the market in `language`
    pub fn name_template(&self, language: &Language) -> Option<&str> {
        self.description.as_ref()?.name(language)
    }

    /// Name template of outcome `outcome_id` in `language`
    pub fn outcome_template(&self, outcome_id: &str, language: &Language) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| o.id == outcome_id)?
            .name(language)
    }

    pub fn outcome_mapping(&self, outcome_id: &str) -> Option<&OutcomeMapping> {
        self.mapping.as_ref()?.outcome(outcome_id)
    }
}

/// Cache timing for the provider's caches
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub invariant: RefreshSchedule,
    pub variant_list: RefreshSchedule,
    pub single_variant_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            invariant: RefreshSchedule::new(Duration::from_secs(5), Duration::from_secs(6 * 3600)),
            variant_list: RefreshSchedule::new(Duration::from_secs(5), Duration::from_secs(6 * 3600)),
            single_variant_ttl: Duration::from_secs(3 * 3600),
        }
    }
}

pub struct MarketCacheProvider {
    invariant: Arc<InvariantMarketCache>,
    variant_list: Arc<VariantListCache>,
    single_variant: Arc<SingleVariantCache>,
}

impl MarketCacheProvider {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        languages: Vec<Language>,
        settings: CacheSettings,
        hub: &CacheInvalidationHub,
    ) -> Self {
        let invariant = Arc::new(InvariantMarketCache::new(
            Arc::clone(&source),
            languages.clone(),
            settings.invariant,
        ));
        let variant_list = Arc::new(VariantListCache::new(
            Arc::clone(&source),
            languages,
            settings.variant_list,
        ));
        let single_variant = Arc::new(SingleVariantCache::new(source, settings.single_variant_ttl));

        hub.register(invariant.clone());
        hub.register(variant_list.clone());

        Self {
            invariant,
            variant_list,
            single_variant,
        }
    }

    pub fn invariant(&self) -> &Arc<InvariantMarketCache> {
        &self.invariant
    }

    pub fn variant_list(&self) -> &Arc<VariantListCache> {
        &self.variant_list
    }

    pub fn single_variant(&self) -> &Arc<SingleVariantCache> {
        &self.single_variant
    }

    /// Start the periodic refresh of both bulk caches
    pub fn spawn_refresh(&self) -> Vec<RefreshHandle> {
        vec![
            self.invariant.spawn_refresh(),
            self.variant_list.spawn_refresh(),
        ]
    }

    /// Load every configured language of the bulk caches now
    pub async fn warm_up(&self, languages: &[Language]) {
        for language in languages {
            if let Err(e) = self.invariant.ensure_language(language).await {
                warn!("Invariant markets for '{}' not loaded: {}", language, e);
            }
            if let Err(e) = self.variant_list.ensure_language(language).await {
                warn!("Variant list for '{}' not loaded: {}", language, e);
            }
        }
    }

    /// Resolve names, outcomes and the applicable mapping of a market occurrence
    ///
    /// Never fails; anything that cannot be resolved yields a degraded result.
    pub async fn resolve(
        &self,
        market_id: i32,
        specifiers: &Specifiers,
        producer_id: i32,
        languages: &[Language],
    ) -> ResolvedDescription {
        let Some(description) = self.invariant.get(&market_id, languages).await else {
            warn!("Market {} has no description, resolving to raw ids", market_id);
            return ResolvedDescription::unresolved(market_id);
        };

        let token = specifiers.get(VARIANT_SPECIFIER).map(String::as_str);
        let (outcomes, mappings, source) = match description.variant_reference() {
            None => (
                description.outcomes.clone().unwrap_or_default(),
                description.mappings.clone(),
                DescriptionSource::Invariant,
            ),
            Some(reference) => {
                let shared = match &reference {
                    VariantReference::Shared(id) => Some(id.as_str()),
                    VariantReference::PerOccurrence => token,
                };
                match self.resolve_variant(market_id, shared, token, languages).await {
                    Some(resolved) => resolved,
                    None => {
                        warn!(
                            "Market {} variant {:?} could not be resolved",
                            market_id, token
                        );
                        (
                            Vec::new(),
                            description.mappings.clone(),
                            DescriptionSource::VariantMissing,
                        )
                    }
                }
            }
        };

        let mapping = select_mapping(&mappings, producer_id, specifiers).cloned();
        if mapping.is_none() {
            debug!(
                "Market {} has no mapping for producer {}",
                market_id, producer_id
            );
        }

        ResolvedDescription {
            market_id,
            description: Some(description),
            outcomes,
            mapping,
            source,
        }
    }

    /// Outcomes and mappings of a variant, shared list first, then single lookup
    async fn resolve_variant(
        &self,
        market_id: i32,
        shared: Option<&str>,
        token: Option<&str>,
        languages: &[Language],
    ) -> Option<(Vec<OutcomeDescription>, Vec<MarketMapping>, DescriptionSource)> {
        if let Some(id) = shared {
            if let Some(variant) = self.variant_list.get(&id.to_string(), languages).await {
                return Some((
                    variant.outcomes.clone(),
                    variant.mappings.clone(),
                    DescriptionSource::VariantList,
                ));
            }
        }

        let token = token?;
        let single = self.single_variant.get(market_id, token, languages).await?;
        Some((
            single.outcomes.unwrap_or_default(),
            single.mappings,
            DescriptionSource::SingleVariant,
        ))
    }

    /// Specifiers declared by `market_id` in the current snapshot, never fetching
    pub fn declared_specifiers(&self, market_id: i32) -> Option<Vec<SpecifierDescription>> {
        self.invariant
            .peek(&market_id)
            .map(|description| description.specifiers.clone())
    }
}
