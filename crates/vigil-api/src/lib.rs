// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP control API for the Vigil channel monitor.
//!
//! Exposes connection status, the rolling message history, and the mutable
//! filter/notification/routing configuration over JSON. All endpoints
//! answer 503 until the monitor session has completed its first gateway
//! handshake.

pub mod handlers;
pub mod server;

pub use server::{start_server, ServerConfig};

use vigil_monitor::MonitorHandle;

/// Shared state for axum request handlers.
///
/// The monitor handle is injected at router construction; handlers never
/// reach for globals.
#[derive(Clone)]
pub struct ApiState {
    pub monitor: MonitorHandle,
}
