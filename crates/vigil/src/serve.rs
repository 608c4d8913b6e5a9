// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil serve` command implementation.
//!
//! Wires the Discord gateway adapter, the Pushover dispatcher, the monitor
//! session, and the control API together, then runs the session until
//! ctrl-c or a terminal startup failure.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use vigil_api::{start_server, ServerConfig};
use vigil_config::VigilConfig;
use vigil_core::error::VigilError;
use vigil_core::traits::ChatGateway;
use vigil_core::types::{ChannelId, RoutingConfig, UserId};
use vigil_discord::DiscordGateway;
use vigil_monitor::{MonitorConfig, MonitorSession};
use vigil_pushover::{PushoverCredentials, PushoverNotifier};

/// Runs the `vigil serve` command.
pub async fn run_serve(config: VigilConfig) -> Result<(), VigilError> {
    init_tracing(&config.monitor.log_level);

    info!(monitor = config.monitor.name.as_str(), "starting vigil serve");

    // Validation has already required these; the checks double as explicit
    // startup errors when run_serve is driven directly.
    let token = config
        .gateway
        .token
        .clone()
        .ok_or_else(|| VigilError::Config("gateway.token is required".into()))?;
    let user_key = config
        .pushover
        .user_key
        .clone()
        .ok_or_else(|| VigilError::Config("pushover.user_key is required".into()))?;
    let api_token = config
        .pushover
        .api_token
        .clone()
        .ok_or_else(|| VigilError::Config("pushover.api_token is required".into()))?;

    let notifier = Arc::new(PushoverNotifier::new(PushoverCredentials {
        user_key,
        api_token,
    })?);

    let mut gateway = DiscordGateway::new(token)?;
    gateway.connect().await?;
    let gateway: Arc<dyn ChatGateway> = Arc::new(gateway);

    let monitor_config = MonitorConfig {
        routing: RoutingConfig {
            channel_ids: config.gateway.channel_ids.iter().copied().map(ChannelId).collect(),
            user_ids: config.gateway.user_ids.iter().copied().map(UserId).collect(),
        },
        filters: config.filters.clone(),
        notifications: config.notifications.clone(),
    };

    let session = MonitorSession::new(Arc::clone(&gateway), notifier, monitor_config);
    let handle = session.handle();

    // Control API runs as a background task over an injected handle.
    let server_config = ServerConfig {
        host: config.api.host.clone(),
        port: config.api.port,
    };
    tokio::spawn(async move {
        if let Err(e) = start_server(&server_config, handle).await {
            error!(error = %e, "control API server error");
        }
    });

    // Graceful shutdown on ctrl-c. In-flight dispatch tasks are abandoned;
    // no delivery is guaranteed once shutdown begins.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                return;
            }
            info!("received ctrl-c, shutting down");
            cancel.cancel();
        });
    }

    let result = session.run(cancel).await;
    gateway.shutdown().await?;
    result
}

/// Initializes the tracing subscriber from the configured log level,
/// honoring RUST_LOG when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = [
            "vigil",
            "vigil_api",
            "vigil_config",
            "vigil_core",
            "vigil_discord",
            "vigil_monitor",
            "vigil_pushover",
        ]
        .map(|target| format!("{target}={log_level}"))
        .join(",");
        EnvFilter::new(format!("warn,{directives}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
