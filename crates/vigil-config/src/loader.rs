// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vigil.toml` > `~/.config/vigil/vigil.toml` >
//! `/etc/vigil/vigil.toml` with environment variable overrides via the
//! `VIGIL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VigilConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vigil/vigil.toml` (system-wide)
/// 3. `~/.config/vigil/vigil.toml` (user XDG config)
/// 4. `./vigil.toml` (local directory)
/// 5. `VIGIL_*` environment variables
pub fn load_config() -> Result<VigilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::file("/etc/vigil/vigil.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vigil/vigil.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vigil.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VigilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VigilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VIGIL_PUSHOVER_USER_KEY` must map to
/// `pushover.user_key`, not `pushover.user.key`.
fn env_provider() -> Env {
    Env::prefixed("VIGIL_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name onto a config key path.
///
/// Only the leading section name becomes a dot, so keys like
/// `pushover_api_token` keep their inner underscores:
/// `VIGIL_PUSHOVER_API_TOKEN` -> `pushover.api_token`.
fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 6] = [
        "monitor",
        "gateway",
        "pushover",
        "api",
        "filters",
        "notifications",
    ];

    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(rest) = rest.strip_prefix('_')
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
