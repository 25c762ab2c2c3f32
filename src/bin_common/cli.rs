//! CLI utilities for binaries
//!
//! Handles configuration path lookup and argument parsing
//! for all binary executables.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Feed configuration (config/oddsfeed.yaml)
    Feed,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Feed => "config/oddsfeed.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        "ODDSFEED_CONFIG_PATH"
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use oddsfeed_client::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Feed);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Command line arguments, excluding the program name
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Feed.default_path(), "config/oddsfeed.yaml");
        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
        assert_eq!(custom.env_var_name(), "ODDSFEED_CONFIG_PATH");
    }
}
