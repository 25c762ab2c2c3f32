//! Catalog source contract
//!
//! The description caches never talk HTTP themselves; they pull catalog
//! payloads through [`CatalogSource`]. The payload shapes below are the wire
//! contract of that source.

use crate::domain::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Source of market and variant descriptions
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every invariant market description in `language`
    async fn market_descriptions(&self, language: &Language) -> Result<Vec<MarketDescriptionDto>>;

    /// Every shared variant description in `language`
    async fn variant_descriptions(&self, language: &Language) -> Result<Vec<VariantDescriptionDto>>;

    /// Description of one market for one concrete variant; `None` when the
    /// catalog does not know the combination
    async fn market_variant_description(
        &self,
        market_id: i32,
        variant: &str,
        language: &Language,
    ) -> Result<Option<MarketDescriptionDto>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDescriptionDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Shared variant id, when the market always uses the same variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// `free_text` marks markets whose outcomes are known per occurrence only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_type: Option<String>,
    /// Pipe-delimited group tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifiers: Option<Vec<SpecifierDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<OutcomeDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Vec<MappingDto>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecifierDto {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDto {
    pub product_id: i32,
    /// Pipe-delimited producer ids the mapping applies to
    #[serde(default)]
    pub product_ids: String,
    /// `all` or a sport urn
    #[serde(default = "default_sport_scope")]
    pub sport_id: String,
    /// Vendor market id, possibly composite (`8:232`)
    pub market_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sov_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<OutcomeMappingDto>>,
}

fn default_sport_scope() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMappingDto {
    pub outcome_id: String,
    pub product_outcome_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_outcome_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptionDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<OutcomeDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Vec<MappingDto>>,
}
