use crate::cache::catalog::{
    CatalogError, CatalogSource, MarketDescriptionDto, Result, VariantDescriptionDto,
};
use crate::domain::Language;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Catalog API client serving market and variant descriptions
pub struct HttpCatalogClient {
    base_url: String,
    access_token: Option<String>,
    client: Client,
}

impl HttpCatalogClient {
    /// Create new catalog client
    pub fn new(base_url: impl Into<String>, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Catalog client targeting {}", base_url);

        Ok(Self {
            base_url,
            access_token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("include_mappings", "true")]);
        if let Some(token) = &self.access_token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Catalog returned 404 for {}", url);
            return Ok(None);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limit exceeded");
            return Err(CatalogError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CatalogError::ApiError(format!(
                "GET {} failed ({}): {}",
                path, status, error_text
            )));
        }

        let body = response
            .json()
            .await
            .map_err(|e| CatalogError::DeserializeFailed(e.to_string()))?;

        Ok(Some(body))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn market_descriptions(&self, language: &Language) -> Result<Vec<MarketDescriptionDto>> {
        let path = format!("/v1/descriptions/{}/markets.json", language);
        let markets: Vec<MarketDescriptionDto> = self.get_json(&path).await?.unwrap_or_default();
        info!("Fetched {} market descriptions ({})", markets.len(), language);
        Ok(markets)
    }

    async fn variant_descriptions(&self, language: &Language) -> Result<Vec<VariantDescriptionDto>> {
        let path = format!("/v1/descriptions/{}/variants.json", language);
        let variants: Vec<VariantDescriptionDto> = self.get_json(&path).await?.unwrap_or_default();
        info!("Fetched {} variant descriptions ({})", variants.len(), language);
        Ok(variants)
    }

    async fn market_variant_description(
        &self,
        market_id: i32,
        variant: &str,
        language: &Language,
    ) -> Result<Option<MarketDescriptionDto>> {
        let path = format!(
            "/v1/descriptions/{}/markets/{}/variants/{}.json",
            language, market_id, variant
        );
        self.get_json(&path).await
    }
}
