//! Market and variant description caches
//!
//! Three tiers back market resolution:
//! - `invariant`: every market shape, bulk-loaded per language and refreshed on a timer
//! - `variant_list`: shared variant outcome sets, same strategy
//! - `single_variant`: per-occurrence variants fetched one at a time with a short TTL
//!
//! [`MarketCacheProvider`] composes them with mapping selection.

pub mod bulk;
pub mod catalog;
pub mod descriptions;
pub mod hub;
pub mod invariant;
pub mod mapping;
pub mod provider;
pub mod single_variant;
pub mod store;
pub mod timer;
pub mod variant_list;

pub use bulk::{BulkDescriptionCache, CatalogEntity, RefreshSchedule};
pub use catalog::{CatalogError, CatalogSource};
pub use descriptions::{
    MarketDescription, MarketMapping, OutcomeDescription, OutcomeMapping, SpecifierDescription,
    SpecifierType, SportScope, ValidFor, VariantDescription, VariantReference,
};
pub use hub::{CacheInvalidationHub, DescriptionSink};
pub use invariant::InvariantMarketCache;
pub use mapping::select_mapping;
pub use provider::{CacheSettings, DescriptionSource, MarketCacheProvider, ResolvedDescription};
pub use single_variant::SingleVariantCache;
pub use store::CacheStore;
pub use timer::{spawn_periodic, RefreshHandle};
pub use variant_list::VariantListCache;
