//! Tests for configuration parsing

use stackboost_core::config::CONFIG_FILENAME;
use stackboost_core::license::client::DEFAULT_API_URL;
use stackboost_core::{LicensePolicy, StackboostConfig};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = StackboostConfig::default();
    assert_eq!(config.license.api_url, DEFAULT_API_URL);
    assert_eq!(config.license.timeout(), Duration::from_secs(15));
    assert_eq!(config.license.policy(), LicensePolicy::default());
    assert_eq!(config.log.level, "warn");
    assert!(config.store.path.is_none());
}

#[test]
fn test_serialize_config() {
    let config = StackboostConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("grace_period_hours = 72"));
    assert!(toml_str.contains("cache_ttl_hours = 12"));
    assert!(!toml_str.contains("instance_name"));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config: StackboostConfig = toml::from_str("").unwrap();
    assert_eq!(config.license.cache_ttl_hours, 12);
    assert_eq!(config.license.grace_period_hours, 72);
}

#[test]
fn test_parse_overrides() {
    let toml_str = r#"
[license]
api_url = "https://licenses.example.test/v1/licenses"
timeout_secs = 5
cache_ttl_hours = 1
grace_period_hours = 24
instance_name = "support.example.com"

[store]
path = "/var/lib/stackboost/store.json"

[log]
level = "debug"
"#;

    let config: StackboostConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.license.api_url, "https://licenses.example.test/v1/licenses");
    assert_eq!(config.license.timeout(), Duration::from_secs(5));
    assert_eq!(
        config.license.policy(),
        LicensePolicy {
            cache_ttl: Duration::from_secs(3600),
            grace_period: Duration::from_secs(24 * 3600),
        }
    );
    assert_eq!(config.license.instance_name(), "support.example.com");
    assert_eq!(
        config.store.resolve_path(),
        Some(PathBuf::from("/var/lib/stackboost/store.json"))
    );
    assert_eq!(config.log.level, "debug");
}

#[test]
fn test_blank_instance_name_falls_back() {
    let config: StackboostConfig = toml::from_str("[license]\ninstance_name = \"  \"\n").unwrap();
    let name = config.license.instance_name();
    assert!(!name.trim().is_empty());
}

#[test]
fn test_save_and_find_and_load() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let mut config = StackboostConfig::default();
    config.license.grace_period_hours = 48;
    config.save(&tmp.path().join(CONFIG_FILENAME)).unwrap();

    let loaded = StackboostConfig::find_and_load(&nested).unwrap();
    assert_eq!(loaded.license.grace_period_hours, 48);
}

#[test]
fn test_invalid_config_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(CONFIG_FILENAME);
    std::fs::write(&path, "[license]\ntimeout_secs = \"soon\"\n").unwrap();
    assert!(StackboostConfig::from_file(&path).is_err());
}

#[test]
fn test_huge_hours_saturate() {
    let config: StackboostConfig = toml::from_str(
        "[license]\ncache_ttl_hours = 9223372036854775807\ngrace_period_hours = 9007199254740993\n",
    )
    .unwrap();
    let policy = config.license.policy();
    assert_eq!(policy.cache_ttl, Duration::from_secs(u64::MAX));
    assert_eq!(policy.grace_period, Duration::from_secs(u64::MAX));
}
