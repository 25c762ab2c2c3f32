//! Shared variant descriptions, bulk-loaded per language

use super::bulk::{BulkDescriptionCache, CatalogEntity};
use super::catalog::{self, CatalogSource, VariantDescriptionDto};
use super::descriptions::VariantDescription;
use super::hub::DescriptionSink;
use crate::domain::Language;
use futures::future::BoxFuture;

pub type VariantListCache = BulkDescriptionCache<VariantDescription>;

impl CatalogEntity for VariantDescription {
    type Key = String;
    type Dto = VariantDescriptionDto;

    const KIND: &'static str = "VariantList";

    fn key_of(dto: &Self::Dto) -> Self::Key {
        dto.id.clone()
    }

    fn from_dto(dto: &Self::Dto, language: &Language) -> Self {
        VariantDescription::from_dto(dto, language)
    }

    fn merge_dto(&mut self, dto: &Self::Dto, language: &Language) {
        self.merge(dto, language);
    }

    fn fetch<'a>(
        source: &'a dyn CatalogSource,
        language: &'a Language,
    ) -> BoxFuture<'a, catalog::Result<Vec<Self::Dto>>> {
        source.variant_descriptions(language)
    }
}

impl DescriptionSink for VariantListCache {
    fn name(&self) -> &'static str {
        <VariantDescription as CatalogEntity>::KIND
    }

    fn merge_variants(&self, descriptions: &[VariantDescriptionDto], language: &Language) -> usize {
        self.merge(descriptions, language)
    }
}
