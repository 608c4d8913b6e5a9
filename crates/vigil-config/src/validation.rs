// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: required credentials, non-empty routing sets, and sane
//! bind/filter values. Startup aborts when any of these fail.

use crate::diagnostic::ConfigError;
use crate::model::VigilConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VigilConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config
        .gateway
        .token
        .as_deref()
        .is_none_or(|t| t.trim().is_empty())
    {
        errors.push(ConfigError::MissingKey {
            key: "gateway.token".to_string(),
            hint: "set it in vigil.toml or via VIGIL_GATEWAY_TOKEN".to_string(),
        });
    }

    if config
        .pushover
        .user_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        errors.push(ConfigError::MissingKey {
            key: "pushover.user_key".to_string(),
            hint: "set it in vigil.toml or via VIGIL_PUSHOVER_USER_KEY".to_string(),
        });
    }

    if config
        .pushover
        .api_token
        .as_deref()
        .is_none_or(|t| t.trim().is_empty())
    {
        errors.push(ConfigError::MissingKey {
            key: "pushover.api_token".to_string(),
            hint: "set it in vigil.toml or via VIGIL_PUSHOVER_API_TOKEN".to_string(),
        });
    }

    if config.gateway.channel_ids.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.channel_ids must list at least one channel id".to_string(),
        });
    }

    if config.gateway.user_ids.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.user_ids must list at least one author id".to_string(),
        });
    }

    // Validate api.host looks like a valid IP or hostname.
    let host = config.api.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("api.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.monitor.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "monitor.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.monitor.log_level
            ),
        });
    }

    // Extensions are matched as `.ext` suffixes, so entries carry no dot.
    for ext in &config.filters.image_extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.chars().any(char::is_whitespace) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "filters.image_extensions entry `{ext}` must be a bare extension like `png`"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
