// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the control API.
//!
//! GET /api/status, /api/messages, /api/config; PUT /api/config/{filters,
//! notifications,channels,users}. PUT responses echo the applied value in a
//! `{status: "success", ...}` envelope.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use vigil_core::types::{
    ChannelId, FilterConfig, HistoryRecord, NotificationConfig, UserId,
};

use crate::ApiState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One monitored channel in the status response.
#[derive(Debug, Serialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
}

/// Response body for GET /api/status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub channels: Vec<ChannelInfo>,
}

/// Response body for GET /api/config.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub channel_ids: Vec<ChannelId>,
    pub user_ids: Vec<UserId>,
    pub filters: FilterConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Serialize)]
pub struct FiltersUpdated {
    pub status: &'static str,
    pub filters: FilterConfig,
}

#[derive(Debug, Serialize)]
pub struct NotificationsUpdated {
    pub status: &'static str,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Serialize)]
pub struct ChannelsUpdated {
    pub status: &'static str,
    pub channel_ids: Vec<ChannelId>,
}

#[derive(Debug, Serialize)]
pub struct UsersUpdated {
    pub status: &'static str,
    pub user_ids: Vec<UserId>,
}

/// 503 until the session has completed its first handshake.
fn ensure_ready(state: &ApiState) -> Result<(), Response> {
    if state.monitor.is_initialized() {
        Ok(())
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "monitor session not initialized".to_string(),
            }),
        )
            .into_response())
    }
}

/// GET /api/status
pub async fn get_status(State(state): State<ApiState>) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    let channels = state
        .monitor
        .channels()
        .into_iter()
        .map(|c| ChannelInfo {
            id: c.id,
            name: c.label(),
        })
        .collect();

    Json(StatusResponse {
        connected: state.monitor.is_connected(),
        channels,
    })
    .into_response()
}

/// GET /api/messages
///
/// Up to the last 100 history records, oldest first.
pub async fn get_messages(State(state): State<ApiState>) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    let records: Vec<HistoryRecord> = state.monitor.history();
    Json(records).into_response()
}

/// GET /api/config
pub async fn get_config(State(state): State<ApiState>) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    let config = state.monitor.config();
    Json(ConfigResponse {
        channel_ids: config.routing.channel_ids.iter().copied().collect(),
        user_ids: config.routing.user_ids.iter().copied().collect(),
        filters: config.filters.clone(),
        notifications: config.notifications.clone(),
    })
    .into_response()
}

/// PUT /api/config/filters
pub async fn put_filters(
    State(state): State<ApiState>,
    Json(filters): Json<FilterConfig>,
) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    info!(enabled = filters.enabled, "filter configuration updated");
    state.monitor.set_filters(filters.clone());
    Json(FiltersUpdated {
        status: "success",
        filters,
    })
    .into_response()
}

/// PUT /api/config/notifications
pub async fn put_notifications(
    State(state): State<ApiState>,
    Json(notifications): Json<NotificationConfig>,
) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    info!(
        priority = %notifications.priority,
        sound = notifications.sound.as_str(),
        "notification configuration updated"
    );
    state.monitor.set_notifications(notifications.clone());
    Json(NotificationsUpdated {
        status: "success",
        notifications,
    })
    .into_response()
}

/// PUT /api/config/channels
///
/// Replaces the monitored channel set and re-resolves channel handles.
pub async fn put_channels(
    State(state): State<ApiState>,
    Json(channel_ids): Json<Vec<u64>>,
) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    let ids: Vec<ChannelId> = channel_ids.into_iter().map(ChannelId).collect();
    info!(count = ids.len(), "monitored channels updated");
    state.monitor.set_channels(ids.clone()).await;
    Json(ChannelsUpdated {
        status: "success",
        channel_ids: ids,
    })
    .into_response()
}

/// PUT /api/config/users
pub async fn put_users(
    State(state): State<ApiState>,
    Json(user_ids): Json<Vec<u64>>,
) -> Response {
    if let Err(resp) = ensure_ready(&state) {
        return resp;
    }

    let ids: Vec<UserId> = user_ids.into_iter().map(UserId).collect();
    info!(count = ids.len(), "monitored authors updated");
    state.monitor.set_users(ids.clone());
    Json(UsersUpdated {
        status: "success",
        user_ids: ids,
    })
    .into_response()
}
