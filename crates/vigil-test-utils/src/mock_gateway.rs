// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock gateway for deterministic testing.
//!
//! `MockGateway` implements `ChatGateway` with injectable lifecycle events
//! and a configurable set of resolvable channels.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use vigil_core::error::VigilError;
use vigil_core::traits::ChatGateway;
use vigil_core::types::{ChannelHandle, ChannelId, GatewayEvent};

/// A mock chat gateway for testing.
///
/// Events injected via [`inject`](MockGateway::inject) are returned by
/// `next_event()` in order; channels registered via
/// [`register_channel`](MockGateway::register_channel) are resolvable.
pub struct MockGateway {
    events: Mutex<VecDeque<GatewayEvent>>,
    notify: Notify,
    closed: AtomicBool,
    channels: StdMutex<BTreeMap<ChannelId, ChannelHandle>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            channels: StdMutex::new(BTreeMap::new()),
        }
    }

    /// Makes a channel resolvable through this gateway.
    pub fn register_channel(&self, handle: ChannelHandle) {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id, handle);
    }

    /// Removes all resolvable channels.
    pub fn clear_channels(&self) {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Queues an event for the next `next_event()` call.
    pub async fn inject(&self, event: GatewayEvent) {
        self.events.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Ends the event stream: pending and future `next_event()` calls
    /// return an error once the queue drains.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn connect(&mut self) -> Result<(), VigilError> {
        Ok(())
    }

    async fn next_event(&self) -> Result<GatewayEvent, VigilError> {
        loop {
            {
                let mut queue = self.events.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(VigilError::Gateway {
                    message: "mock gateway event stream closed".into(),
                    source: None,
                });
            }
            self.notify.notified().await;
        }
    }

    async fn resolve_channel(&self, id: ChannelId) -> Option<ChannelHandle> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    async fn shutdown(&self) -> Result<(), VigilError> {
        self.close();
        Ok(())
    }
}
