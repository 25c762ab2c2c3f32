//! Invariant market descriptions, bulk-loaded per language

use super::bulk::{BulkDescriptionCache, CatalogEntity};
use super::catalog::{self, CatalogSource, MarketDescriptionDto};
use super::descriptions::MarketDescription;
use super::hub::DescriptionSink;
use crate::domain::Language;
use futures::future::BoxFuture;
use tracing::debug;

pub type InvariantMarketCache = BulkDescriptionCache<MarketDescription>;

impl CatalogEntity for MarketDescription {
    type Key = i32;
    type Dto = MarketDescriptionDto;

    const KIND: &'static str = "InvariantMarkets";

    fn key_of(dto: &Self::Dto) -> Self::Key {
        dto.id
    }

    fn from_dto(dto: &Self::Dto, language: &Language) -> Self {
        let mut description = MarketDescription::new(dto.id);
        description.merge_dto(dto, language);
        description
    }

    fn merge_dto(&mut self, dto: &Self::Dto, language: &Language) {
        self.merge(dto, language);
        // Variant-dependent markets carry no outcomes of their own
        if self.is_variant_dependent() && self.outcomes.take().is_some() {
            debug!(
                "Market {} is variant dependent, ignoring its inline outcomes",
                self.id
            );
        }
    }

    fn fetch<'a>(
        source: &'a dyn CatalogSource,
        language: &'a Language,
    ) -> BoxFuture<'a, catalog::Result<Vec<Self::Dto>>> {
        source.market_descriptions(language)
    }
}

impl DescriptionSink for InvariantMarketCache {
    fn name(&self) -> &'static str {
        <MarketDescription as CatalogEntity>::KIND
    }

    fn merge_markets(&self, descriptions: &[MarketDescriptionDto], language: &Language) -> usize {
        self.merge(descriptions, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::catalog::{OutcomeDto, SpecifierDto};

    fn dto(id: i32, specifiers: &[&str]) -> MarketDescriptionDto {
        MarketDescriptionDto {
            id,
            name: format!("Market {}", id),
            description: None,
            variant: None,
            outcome_type: None,
            groups: None,
            specifiers: Some(
                specifiers
                    .iter()
                    .map(|name| SpecifierDto {
                        name: name.to_string(),
                        kind: "string".to_string(),
                        description: None,
                    })
                    .collect(),
            ),
            outcomes: Some(vec![OutcomeDto {
                id: "1".to_string(),
                name: "Yes".to_string(),
                description: None,
            }]),
            attributes: None,
            mappings: None,
        }
    }

    #[test]
    fn test_variant_dependent_market_has_no_outcomes() {
        let en = Language::new("en");
        let dynamic = <MarketDescription as CatalogEntity>::from_dto(&dto(534, &["variant"]), &en);
        assert!(dynamic.outcomes.is_none());

        let fixed = <MarketDescription as CatalogEntity>::from_dto(&dto(1, &[]), &en);
        assert_eq!(fixed.outcomes.map(|o| o.len()), Some(1));
    }
}
