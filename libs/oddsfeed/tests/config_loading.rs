//! Loading `FeedConfig` from YAML files

use oddsfeed::infrastructure::{ConfigError, FeedConfig};
use oddsfeed::routing::{generate_keys, MessageInterest};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_with_defaults() {
    let file = write_config(
        r#"
languages: [en, de]
catalog:
  base_url: https://catalog.example.com
interests: [prematch, live]
"#,
    );

    let config = FeedConfig::load(file.path()).unwrap();
    assert_eq!(config.languages.len(), 2);
    assert_eq!(config.languages[0].as_str(), "en");
    assert_eq!(config.timeout(), Duration::from_secs(15));
    assert_eq!(config.log_level, "info");

    let settings = config.cache.settings();
    assert_eq!(settings.invariant.startup_delay, Duration::from_secs(5));
    assert_eq!(settings.variant_list.interval, Duration::from_secs(6 * 60 * 60));

    let keys = generate_keys(&config.interests).unwrap();
    assert!(keys.contains(&"*.pre.*.#".to_string()));
    assert!(keys.contains(&"*.*.live.#".to_string()));
    assert_eq!(config.interests, vec![MessageInterest::Prematch, MessageInterest::Live]);
}

#[test]
fn test_cache_overrides() {
    let file = write_config(
        r#"
languages: [en]
catalog:
  base_url: https://catalog.example.com
  timeout_secs: 3
cache:
  single_variant_ttl_secs: 120
  invariant_refresh_interval_secs: 600
log_level: debug
"#,
    );

    let config = FeedConfig::load(file.path()).unwrap();
    let settings = config.cache.settings();
    assert_eq!(settings.single_variant_ttl, Duration::from_secs(120));
    assert_eq!(settings.invariant.interval, Duration::from_secs(600));
    assert_eq!(config.timeout(), Duration::from_secs(3));
    assert_eq!(config.interests, vec![MessageInterest::All]);
}

#[test]
fn test_invalid_files_are_rejected() {
    let empty_languages = write_config(
        r#"
languages: []
catalog:
  base_url: https://catalog.example.com
"#,
    );
    assert!(matches!(
        FeedConfig::load(empty_languages.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let zero_interval = write_config(
        r#"
languages: [en]
catalog:
  base_url: https://catalog.example.com
cache:
  variant_list_refresh_interval_secs: 0
"#,
    );
    assert!(matches!(
        FeedConfig::load(zero_interval.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let not_yaml = write_config("languages: [en\n");
    assert!(matches!(
        FeedConfig::load(not_yaml.path()),
        Err(ConfigError::YamlError(_))
    ));

    assert!(matches!(
        FeedConfig::load("/nonexistent/oddsfeed.yaml"),
        Err(ConfigError::FileError(_))
    ));
}
