// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Control API server built on axum.
//!
//! Sets up routes, permissive CORS for the dashboard, and the shared state.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::CorsLayer;

use vigil_core::error::VigilError;
use vigil_monitor::MonitorHandle;

use crate::{handlers, ApiState};

/// Control API bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the control API router over the given state.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::get_status))
        .route("/api/messages", get(handlers::get_messages))
        .route("/api/config", get(handlers::get_config))
        .route("/api/config/filters", put(handlers::put_filters))
        .route("/api/config/notifications", put(handlers::put_notifications))
        .route("/api/config/channels", put(handlers::put_channels))
        .route("/api/config/users", put(handlers::put_users))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Starts the control API server and serves until the process ends.
pub async fn start_server(config: &ServerConfig, monitor: MonitorHandle) -> Result<(), VigilError> {
    let state = ApiState { monitor };
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VigilError::Internal(format!("failed to bind control API to {addr}: {e}")))?;

    tracing::info!("control API listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VigilError::Internal(format!("control API server error: {e}")))?;

    Ok(())
}
