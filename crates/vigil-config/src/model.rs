// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vigil channel monitor.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, producing actionable error messages.

use serde::{Deserialize, Serialize};
use vigil_core::types::{FilterConfig, NotificationConfig};

/// Top-level Vigil configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. The `gateway` and `pushover` sections carry required
/// credentials; everything else defaults to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    /// Monitor identity and logging settings.
    #[serde(default)]
    pub monitor: MonitorSettings,

    /// Chat gateway credentials and initial routing sets.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Pushover API credentials.
    #[serde(default)]
    pub pushover: PushoverConfig,

    /// Control API bind settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Initial content filter.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Initial notification delivery settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Monitor identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSettings {
    /// Display name used in startup notifications and logs.
    #[serde(default = "default_monitor_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            name: default_monitor_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_monitor_name() -> String {
    "vigil".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Gateway bot token. Required.
    #[serde(default)]
    pub token: Option<String>,

    /// Channel ids to monitor at startup. Required, non-empty.
    #[serde(default)]
    pub channel_ids: Vec<u64>,

    /// Author ids to monitor at startup. Required, non-empty.
    #[serde(default)]
    pub user_ids: Vec<u64>,
}

/// Pushover API credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PushoverConfig {
    /// Pushover user key. Required.
    #[serde(default)]
    pub user_key: Option<String>,

    /// Pushover application token. Required.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Control API bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Host address to bind.
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    7777
}
