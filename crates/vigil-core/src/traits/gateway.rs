// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway collaborator trait for real-time chat transports (Discord).

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{ChannelHandle, ChannelId, GatewayEvent};

/// Adapter over an external real-time chat gateway.
///
/// Implementations wrap a transport library that owns connection
/// establishment, heartbeats, and reconnection; the monitor session only
/// consumes the resulting event stream and resolves channel handles.
#[async_trait]
pub trait ChatGateway: Send + Sync + 'static {
    /// Human-readable adapter name, used in logs.
    fn name(&self) -> &str;

    /// Starts the underlying transport as a background task.
    async fn connect(&mut self) -> Result<(), VigilError>;

    /// Returns the next lifecycle event. Events arrive as a single logical
    /// stream in gateway order.
    async fn next_event(&self) -> Result<GatewayEvent, VigilError>;

    /// Resolves a channel id to a live handle, if the gateway knows it.
    async fn resolve_channel(&self, id: ChannelId) -> Option<ChannelHandle>;

    /// Releases transport resources. In-flight events may be dropped.
    async fn shutdown(&self) -> Result<(), VigilError>;
}
