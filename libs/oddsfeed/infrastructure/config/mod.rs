use crate::cache::{CacheSettings, RefreshSchedule};
use crate::domain::Language;
use crate::routing::MessageInterest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const ACCESS_TOKEN_ENV: &str = "ODDSFEED_ACCESS_TOKEN";
pub const API_URL_ENV: &str = "ODDSFEED_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Feed client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Languages names are resolved in; the first is the default
    pub languages: Vec<Language>,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_interests")]
    pub interests: Vec<MessageInterest>,

    /// Catalog access token from .env (not in YAML)
    #[serde(skip)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_startup_delay")]
    pub invariant_startup_delay_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub invariant_refresh_interval_secs: u64,
    #[serde(default = "default_startup_delay")]
    pub variant_list_startup_delay_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub variant_list_refresh_interval_secs: u64,
    #[serde(default = "default_single_variant_ttl")]
    pub single_variant_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            invariant_startup_delay_secs: default_startup_delay(),
            invariant_refresh_interval_secs: default_refresh_interval(),
            variant_list_startup_delay_secs: default_startup_delay(),
            variant_list_refresh_interval_secs: default_refresh_interval(),
            single_variant_ttl_secs: default_single_variant_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            invariant: RefreshSchedule::new(
                Duration::from_secs(self.invariant_startup_delay_secs),
                Duration::from_secs(self.invariant_refresh_interval_secs),
            ),
            variant_list: RefreshSchedule::new(
                Duration::from_secs(self.variant_list_startup_delay_secs),
                Duration::from_secs(self.variant_list_refresh_interval_secs),
            ),
            single_variant_ttl: Duration::from_secs(self.single_variant_ttl_secs),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_interests() -> Vec<MessageInterest> {
    vec![MessageInterest::All]
}

fn default_timeout() -> u64 {
    15
}

fn default_startup_delay() -> u64 {
    5
}

fn default_refresh_interval() -> u64 {
    6 * 60 * 60
}

fn default_single_variant_ttl() -> u64 {
    3 * 60 * 60
}

impl FeedConfig {
    /// Load configuration from YAML file and .env
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&yaml_content)
    }

    /// Parse YAML and apply environment overrides
    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let mut config: FeedConfig = serde_yaml::from_str(yaml_content)?;

        // Don't fail if .env doesn't exist
        dotenv::dotenv().ok();

        config.access_token = std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty());

        if let Ok(url) = std::env::var(API_URL_ENV) {
            info!("Overriding catalog URL from environment variable");
            config.catalog.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Access token, failing when it was not provided
    pub fn require_access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| ConfigError::EnvVarMissing(ACCESS_TOKEN_ENV.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one language is required".to_string(),
            ));
        }
        if self.languages.iter().any(|l| l.as_str().is_empty()) {
            return Err(ConfigError::ValidationError(
                "languages cannot be empty strings".to_string(),
            ));
        }
        if self.catalog.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.base_url cannot be empty".to_string(),
            ));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "catalog.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let intervals = [
            ("invariant_refresh_interval_secs", self.cache.invariant_refresh_interval_secs),
            ("variant_list_refresh_interval_secs", self.cache.variant_list_refresh_interval_secs),
            ("single_variant_ttl_secs", self.cache.single_variant_ttl_secs),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "cache.{} must be greater than 0",
                    name
                )));
            }
        }

        if self.interests.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one message interest is required".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        let languages: Vec<&str> = self.languages.iter().map(Language::as_str).collect();
        info!("Configuration loaded:");
        info!("  Languages: {}", languages.join(", "));
        info!("  Catalog URL: {}", self.catalog.base_url);
        info!("  Catalog timeout: {} seconds", self.catalog.timeout_secs);
        info!(
            "  Invariant refresh: every {} seconds (first after {})",
            self.cache.invariant_refresh_interval_secs, self.cache.invariant_startup_delay_secs
        );
        info!(
            "  Variant list refresh: every {} seconds (first after {})",
            self.cache.variant_list_refresh_interval_secs,
            self.cache.variant_list_startup_delay_secs
        );
        info!("  Single variant TTL: {} seconds", self.cache.single_variant_ttl_secs);
        info!("  Interests: {:?}", self.interests);
        info!("  Access token: {}", if self.access_token.is_some() { "set" } else { "not set" });
        info!("  Log level: {}", self.log_level);
    }
}
