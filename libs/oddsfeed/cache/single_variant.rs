//! Market descriptions for one concrete variant, fetched on demand
//!
//! Nothing is bulk-loaded here. Each `(market, variant, language)` is fetched
//! the first time it is needed and kept for a short TTL. A lookup the catalog
//! does not know is reported as unavailable and fetched again next time.

use super::catalog::{CatalogError, CatalogSource, MarketDescriptionDto};
use super::descriptions::MarketDescription;
use super::store::CacheStore;
use crate::domain::Language;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type SingleVariantKey = (i32, String, Language);

pub struct SingleVariantCache {
    source: Arc<dyn CatalogSource>,
    store: CacheStore<SingleVariantKey, Option<Arc<MarketDescriptionDto>>>,
}

impl SingleVariantCache {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            store: CacheStore::new("SingleVariant", ttl).with_retention(Option::is_some),
        }
    }

    async fn fetch(
        &self,
        market_id: i32,
        variant: &str,
        language: &Language,
    ) -> Option<Arc<MarketDescriptionDto>> {
        let key = (market_id, variant.to_string(), language.clone());
        let result = self
            .store
            .get_or_populate(&key, || async {
                let dto = self
                    .source
                    .market_variant_description(market_id, variant, language)
                    .await?;
                Ok::<_, CatalogError>(dto.map(Arc::new))
            })
            .await;

        match result {
            Ok(Some(dto)) => Some(dto),
            Ok(None) => {
                debug!(
                    "Catalog has no description for market {} variant {} ({})",
                    market_id, variant, language
                );
                None
            }
            Err(e) => {
                warn!(
                    "Failed to fetch market {} variant {} ({}): {}",
                    market_id, variant, language, e
                );
                None
            }
        }
    }

    /// Description of `market_id` for `variant` in all `languages`
    ///
    /// `None` when any requested language is unavailable.
    pub async fn get(
        &self,
        market_id: i32,
        variant: &str,
        languages: &[Language],
    ) -> Option<MarketDescription> {
        let mut combined: Option<MarketDescription> = None;
        for language in languages {
            let dto = self.fetch(market_id, variant, language).await?;
            match combined.as_mut() {
                Some(description) => description.merge(&dto, language),
                None => combined = Some(MarketDescription::from_dto(&dto, language)),
            }
        }
        combined
    }

    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
