// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Vigil configuration system.

use vigil_config::diagnostic::{suggest_key, ConfigError};
use vigil_config::model::VigilConfig;
use vigil_config::{load_and_validate_str, load_config_from_str};
use vigil_core::types::Priority;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_vigil_config() {
    let toml = r#"
[monitor]
name = "test-monitor"
log_level = "debug"

[gateway]
token = "bot-token"
channel_ids = [111, 222]
user_ids = [333]

[pushover]
user_key = "uk-123"
api_token = "at-456"

[api]
host = "0.0.0.0"
port = 8080

[filters]
enabled = true
keywords = ["launch", "drop"]
link_patterns = ["example.com"]
image_extensions = ["png", "webp"]

[notifications]
priority = "high"
sound = "cosmic"
title_template = "{channel}"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.monitor.name, "test-monitor");
    assert_eq!(config.monitor.log_level, "debug");
    assert_eq!(config.gateway.token.as_deref(), Some("bot-token"));
    assert_eq!(config.gateway.channel_ids, vec![111, 222]);
    assert_eq!(config.gateway.user_ids, vec![333]);
    assert_eq!(config.pushover.user_key.as_deref(), Some("uk-123"));
    assert_eq!(config.pushover.api_token.as_deref(), Some("at-456"));
    assert_eq!(config.api.host, "0.0.0.0");
    assert_eq!(config.api.port, 8080);
    assert!(config.filters.keywords.contains("launch"));
    assert!(config.filters.image_extensions.contains("webp"));
    assert_eq!(config.notifications.priority, Priority::High);
    assert_eq!(config.notifications.sound, "cosmic");
    assert_eq!(config.notifications.title_template.as_deref(), Some("{channel}"));
}

/// Unknown field in [gateway] produces an error naming the bad key.
#[test]
fn unknown_field_in_gateway_produces_error() {
    let toml = r#"
[gateway]
tokn = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("tokn"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Empty TOML uses compiled defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.monitor.name, "vigil");
    assert_eq!(config.monitor.log_level, "info");
    assert!(config.gateway.token.is_none());
    assert!(config.gateway.channel_ids.is_empty());
    assert_eq!(config.api.host, "127.0.0.1");
    assert_eq!(config.api.port, 7777);
    assert!(config.filters.enabled);
    assert!(config.filters.keywords.is_empty());
    assert!(config.filters.image_extensions.contains("jpg"));
    assert_eq!(config.notifications.priority, Priority::Normal);
    assert_eq!(config.notifications.sound, "pushover");
}

/// Dot-notation merge simulates an env var override of a TOML value.
#[test]
fn env_style_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[gateway]
token = "from-toml"
"#;

    let config: VigilConfig = Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("gateway.token", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.gateway.token.as_deref(), Some("from-env"));
}

/// Validation collects every missing required key instead of failing fast.
#[test]
fn validation_collects_all_missing_required_keys() {
    let errors = load_and_validate_str("").expect_err("defaults lack required keys");
    let keys: Vec<String> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::MissingKey { key, .. } => Some(key.clone()),
            _ => None,
        })
        .collect();
    assert!(keys.contains(&"gateway.token".to_string()));
    assert!(keys.contains(&"pushover.user_key".to_string()));
    assert!(keys.contains(&"pushover.api_token".to_string()));
}

/// A fully-specified config passes load_and_validate_str.
#[test]
fn complete_config_passes_validation() {
    let toml = r#"
[gateway]
token = "bot"
channel_ids = [1]
user_ids = [2]

[pushover]
user_key = "uk"
api_token = "at"
"#;
    let config = load_and_validate_str(toml).expect("complete config should validate");
    assert_eq!(config.gateway.channel_ids, vec![1]);
}

/// Missing config files are silently skipped (Figment's Toml::file behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: VigilConfig = Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::file("/nonexistent/path/vigil.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.monitor.name, "vigil");
}

/// suggest_key proposes the right correction for a near-miss.
#[test]
fn suggest_key_for_typoed_field() {
    let valid = &["user_key", "api_token"];
    assert_eq!(suggest_key("user_kye", valid), Some("user_key".to_string()));
}

/// An invalid priority string is rejected at deserialization time.
#[test]
fn invalid_priority_is_rejected() {
    let toml = r#"
[notifications]
priority = "urgent"
"#;
    assert!(load_config_from_str(toml).is_err());
}
