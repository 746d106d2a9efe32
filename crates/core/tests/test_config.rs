//! Tests for configuration parsing

use wayfare_core::config::{BackendKind, CONFIG_FILENAME};
use wayfare_core::{Plan, RestrictMode, SubscriptionSource, SubscriptionStatus, WayfareConfig};

#[test]
fn test_default_config() {
    let config = WayfareConfig::default();
    assert_eq!(config.backend.kind, BackendKind::Memory);
    assert_eq!(config.backend.timeout_secs, 5);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.gate.restrict_mode, RestrictMode::Lock);
    assert_eq!(config.logging.level, "warn");
    assert!(config.registry.path.is_none());
    assert!(config.subscriptions.is_empty());
}

#[test]
fn test_serialize_config() {
    let config = WayfareConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("base_url"));
    assert!(toml_str.contains("restrict_mode"));
    assert!(!toml_str.contains("token"));
}

#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[backend]
kind = "http"
base_url = "https://billing.internal/v2"
timeout_secs = 2
token = "secret"

[cache]
ttl_secs = 0

[gate]
restrict_mode = "blur"

[logging]
level = "debug"
json = true

[[subscriptions]]
user_id = "alice"
plan = "season"
status = "active"

[[subscriptions]]
user_id = "bob"
plan = "year"
status = "expired"
"#;

    let config: WayfareConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.backend.kind, BackendKind::Http);
    assert_eq!(config.backend.base_url, "https://billing.internal/v2");
    assert_eq!(config.backend.token.as_deref(), Some("secret"));
    assert_eq!(config.cache.ttl_secs, 0);
    assert!(!config.build_cache().is_enabled());
    assert_eq!(config.gate.restrict_mode, RestrictMode::Blur);
    assert!(config.logging.json);

    assert_eq!(config.subscriptions.len(), 2);
    assert_eq!(config.subscriptions[0].plan, Plan::Season);
    assert_eq!(config.subscriptions[1].status, SubscriptionStatus::Expired);
}

#[test]
fn test_unknown_restrict_mode_is_an_error() {
    let toml_str = r#"
[gate]
restrict_mode = "sparkle"
"#;
    assert!(toml::from_str::<WayfareConfig>(toml_str).is_err());
}

#[test]
fn test_memory_backend_serves_fixtures() {
    let toml_str = r#"
[[subscriptions]]
user_id = "alice"
plan = "month"
status = "active"
"#;
    let config: WayfareConfig = toml::from_str(toml_str).unwrap();
    let source = config.build_source(None).unwrap();
    let sub = source.subscription("alice").unwrap().unwrap();
    assert_eq!(sub.plan, Plan::Month);
    assert!(source.subscription("bob").unwrap().is_none());
}

#[test]
fn test_find_and_load_walks_up() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        tmp.path().join(CONFIG_FILENAME),
        "[cache]\nttl_secs = 42\n",
    )
    .unwrap();

    let config = WayfareConfig::find_and_load(&nested).unwrap();
    assert_eq!(config.cache.ttl_secs, 42);
}

#[test]
fn test_find_and_load_defaults_when_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = WayfareConfig::find_and_load(tmp.path()).unwrap();
    assert_eq!(config.cache.ttl_secs, 300);
}

#[test]
fn test_save_and_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(CONFIG_FILENAME);
    let mut config = WayfareConfig::default();
    config.gate.restrict_mode = RestrictMode::Hide;
    config.save(&path).unwrap();

    let loaded = WayfareConfig::from_file(&path).unwrap();
    assert_eq!(loaded.gate.restrict_mode, RestrictMode::Hide);
}

#[test]
fn test_relative_registry_path_resolves_against_config_dir() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("registry.toml"),
        r#"
[[features]]
id = "ad_free"
name = "Ad-free"
description = ""
category = "account"
required_plans = ["week"]
"#,
    )
    .unwrap();
    let path = tmp.path().join(CONFIG_FILENAME);
    std::fs::write(&path, "[registry]\npath = \"registry.toml\"\n").unwrap();

    let config = WayfareConfig::from_file(&path).unwrap();
    assert_eq!(
        config.registry.path.as_deref(),
        Some(tmp.path().join("registry.toml").as_path())
    );
    let registry = config.load_registry().unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_missing_registry_file_is_an_error() {
    let mut config = WayfareConfig::default();
    config.registry.path = Some("/definitely/not/here.toml".into());
    assert!(config.load_registry().is_err());
}
