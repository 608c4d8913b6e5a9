// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitor session orchestration for the Vigil channel monitor.
//!
//! The [`MonitorSession`] is the central coordinator that:
//! - Consumes lifecycle events from the gateway collaborator
//! - Resolves monitored channels on ready and tracks liveness
//! - Filters, transforms, and records in-scope messages
//! - Spawns notification dispatch per message without blocking the event loop
//! - Exposes a [`MonitorHandle`] for the control API

pub mod filter;
pub mod history;
pub mod transform;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use vigil_core::error::VigilError;
use vigil_core::traits::{ChatGateway, Notifier};
use vigil_core::types::{
    ChannelHandle, ChannelId, FilterConfig, GatewayEvent, HistoryRecord, InboundMessage,
    NotificationConfig, NotificationPayload, RoutingConfig, UserId,
};

use crate::history::HistoryBuffer;

/// Title of startup notifications.
const STARTUP_TITLE: &str = "Vigil Monitor";
/// Title of connection status notifications.
const STATUS_TITLE: &str = "Vigil Monitor Status";
/// Title of error notifications.
const ERROR_TITLE: &str = "Vigil Monitor Error";

/// The mutable runtime configuration, swapped as one immutable snapshot.
///
/// Readers take one `load_full()` per message so routing, filters, and
/// notification settings are always observed consistently.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub routing: RoutingConfig,
    pub filters: FilterConfig,
    pub notifications: NotificationConfig,
}

/// Shared session state, owned by the session and referenced by handles.
struct MonitorState {
    config: ArcSwap<MonitorConfig>,
    /// Serializes configuration writers; readers never take this.
    config_writer: Mutex<()>,
    /// True while the gateway connection is up.
    connected: AtomicBool,
    /// Set once the first handshake completes; gates the control API.
    initialized: AtomicBool,
    channels: Mutex<BTreeMap<ChannelId, ChannelHandle>>,
    history: Mutex<HistoryBuffer>,
}

impl MonitorState {
    fn new(config: MonitorConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            config_writer: Mutex::new(()),
            connected: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            channels: Mutex::new(BTreeMap::new()),
            history: Mutex::new(HistoryBuffer::new()),
        }
    }

    fn lock_channels(&self) -> MutexGuard<'_, BTreeMap<ChannelId, ChannelHandle>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, HistoryBuffer> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The monitor session: consumes gateway events and drives the pipeline.
pub struct MonitorSession {
    gateway: Arc<dyn ChatGateway>,
    notifier: Arc<dyn Notifier>,
    state: Arc<MonitorState>,
}

impl MonitorSession {
    /// Creates a session over the given collaborators with the initial
    /// runtime configuration.
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        notifier: Arc<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            gateway,
            notifier,
            state: Arc::new(MonitorState::new(config)),
        }
    }

    /// Returns a cloneable handle for the control API.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            state: Arc::clone(&self.state),
            gateway: Arc::clone(&self.gateway),
        }
    }

    /// Runs the session until the gateway stream ends, the cancellation
    /// token fires, or startup channel resolution fails entirely.
    ///
    /// Errors local to one message never escape this loop; only a total
    /// resolution failure terminates it with an error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), VigilError> {
        info!(gateway = self.gateway.name(), "monitor session running");

        loop {
            tokio::select! {
                event = self.gateway.next_event() => {
                    match event {
                        Ok(GatewayEvent::Ready) => self.handle_ready().await?,
                        Ok(GatewayEvent::Message(message)) => {
                            if let Err(e) = self.handle_message(*message) {
                                error!(error = %e, "failed to handle message");
                                self.spawn_notify(
                                    format!("Error processing message: {e}"),
                                    ERROR_TITLE,
                                );
                            }
                        }
                        Ok(GatewayEvent::Disconnected) => self.handle_disconnect(),
                        Ok(GatewayEvent::Error(context)) => {
                            error!(context = context.as_str(), "gateway reported error");
                            self.spawn_notify(format!("Gateway error: {context}"), ERROR_TITLE);
                        }
                        Err(e) => {
                            error!(error = %e, "gateway event stream failed");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping monitor session");
                    break;
                }
            }
        }

        self.state.connected.store(false, Ordering::SeqCst);
        info!("monitor session stopped");
        Ok(())
    }

    /// Handshake complete: resolve monitored channels and go Ready.
    ///
    /// Zero successful resolutions is terminal -- a best-effort failure
    /// notification is sent and [`VigilError::NoChannelsResolved`] returned.
    async fn handle_ready(&self) -> Result<(), VigilError> {
        let config = self.state.config.load_full();

        let mut resolved = BTreeMap::new();
        for id in &config.routing.channel_ids {
            match self.gateway.resolve_channel(*id).await {
                Some(handle) => {
                    info!(channel = %id, label = handle.label().as_str(), "monitoring channel");
                    resolved.insert(*id, handle);
                }
                None => {
                    let e = VigilError::ChannelResolution { id: *id };
                    warn!(error = %e, "skipping unresolvable channel");
                }
            }
        }

        if resolved.is_empty() {
            error!("could not resolve any monitored channels");
            let notice = NotificationPayload::text_only(
                "Could not resolve any of the monitored channels",
                ERROR_TITLE,
                &config.notifications,
            );
            let _ = self.notifier.notify(&notice).await;
            return Err(VigilError::NoChannelsResolved);
        }

        let labels: Vec<String> = resolved.values().map(ChannelHandle::label).collect();
        *self.state.lock_channels() = resolved;
        self.state.connected.store(true, Ordering::SeqCst);
        self.state.initialized.store(true, Ordering::SeqCst);

        info!(
            channels = labels.len(),
            authors = config.routing.user_ids.len(),
            "monitor session ready"
        );
        self.spawn_notify(
            format!(
                "Monitor started successfully!\nMonitoring channels: {}",
                labels.join(", ")
            ),
            STARTUP_TITLE,
        );
        Ok(())
    }

    /// One inbound message: scope check, filter, transform, record, and
    /// spawn dispatch.
    ///
    /// Everything up to and including the history append runs synchronously
    /// on the event path, so history order always matches arrival order.
    /// Only the network-bound dispatch is spawned.
    fn handle_message(&self, message: InboundMessage) -> Result<(), VigilError> {
        if !self.state.connected.load(Ordering::SeqCst) {
            debug!(channel = %message.channel_id, "dropping message received while not ready");
            return Ok(());
        }

        let config = self.state.config.load_full();

        if !config
            .routing
            .is_monitored(message.channel_id, message.author_id)
        {
            return Ok(());
        }

        if !filter::matches(&message, &config.filters) {
            debug!(
                channel = %message.channel_id,
                author = %message.author_id,
                "message filtered out"
            );
            return Ok(());
        }

        info!(
            channel = %message.channel_id,
            author = message.author_label().as_str(),
            "message accepted"
        );

        let (record, payload) =
            transform::transform(&message, &config.filters, &config.notifications);
        let channel_label = record.channel.clone();
        self.state.lock_history().append(record);

        let notifier = Arc::clone(&self.notifier);
        let notifications = config.notifications.clone();
        tokio::spawn(async move {
            let report = notifier.notify(&payload).await;
            if report.fully_delivered() {
                return;
            }
            for failure in &report.failures {
                warn!(
                    image = failure.image_url.as_deref().unwrap_or("<text>"),
                    error = %failure.error,
                    "notification delivery failure"
                );
            }
            // Best-effort error notice; its own outcome is ignored so a
            // failing push API cannot cause a failure loop.
            let notice = NotificationPayload::text_only(
                format!(
                    "Failed to deliver {} of {} notification requests for {channel_label}",
                    report.failures.len(),
                    report.attempted()
                ),
                ERROR_TITLE,
                &notifications,
            );
            let _ = notifier.notify(&notice).await;
        });

        Ok(())
    }

    /// Connection lost: flip liveness and notify. Reconnection is the
    /// transport's job; a later ready signal re-enters the ready path.
    fn handle_disconnect(&self) {
        self.state.connected.store(false, Ordering::SeqCst);
        warn!("gateway disconnected, awaiting reconnection");
        self.spawn_notify(
            "Disconnected from gateway. Awaiting reconnection...".to_string(),
            STATUS_TITLE,
        );
    }

    /// Fire-and-forget status/error notification using the current
    /// notification settings. Failures are logged, never propagated.
    fn spawn_notify(&self, body: String, title: &str) {
        let config = self.state.config.load_full();
        let payload = NotificationPayload::text_only(body, title, &config.notifications);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let report = notifier.notify(&payload).await;
            for failure in &report.failures {
                warn!(error = %failure.error, "status notification failed");
            }
        });
    }
}

/// Cloneable handle over the session state for the control API.
///
/// Injected into the API layer at wiring time; configuration writes are
/// serialized by a single writer lock and published as whole snapshots.
#[derive(Clone)]
pub struct MonitorHandle {
    state: Arc<MonitorState>,
    gateway: Arc<dyn ChatGateway>,
}

impl MonitorHandle {
    /// True once the first gateway handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.state.initialized.load(Ordering::SeqCst)
    }

    /// Current gateway liveness.
    pub fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    /// Currently resolved channels, ordered by id.
    pub fn channels(&self) -> Vec<ChannelHandle> {
        self.state.lock_channels().values().cloned().collect()
    }

    /// Snapshot of the message history, oldest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.state.lock_history().snapshot()
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<MonitorConfig> {
        self.state.config.load_full()
    }

    /// Replaces the content filter. Affects only messages processed after
    /// the swap.
    pub fn set_filters(&self, filters: FilterConfig) {
        self.swap_config(|current| MonitorConfig {
            filters,
            ..current.clone()
        });
    }

    /// Replaces the notification settings.
    pub fn set_notifications(&self, notifications: NotificationConfig) {
        self.swap_config(|current| MonitorConfig {
            notifications,
            ..current.clone()
        });
    }

    /// Replaces the monitored author set.
    pub fn set_users(&self, user_ids: Vec<UserId>) {
        self.swap_config(|current| {
            let mut next = current.clone();
            next.routing.user_ids = user_ids.iter().copied().collect();
            next
        });
    }

    /// Replaces the monitored channel set and re-resolves channel handles.
    ///
    /// Ids that fail to resolve stay in the routing set (messages for them
    /// are simply never delivered by the gateway) but get no handle.
    pub async fn set_channels(&self, channel_ids: Vec<ChannelId>) {
        self.swap_config(|current| {
            let mut next = current.clone();
            next.routing.channel_ids = channel_ids.iter().copied().collect();
            next
        });

        let mut resolved = BTreeMap::new();
        for id in &channel_ids {
            match self.gateway.resolve_channel(*id).await {
                Some(handle) => {
                    resolved.insert(*id, handle);
                }
                None => {
                    let e = VigilError::ChannelResolution { id: *id };
                    warn!(error = %e, "channel not resolvable after update");
                }
            }
        }
        *self.state.lock_channels() = resolved;
    }

    fn swap_config(&self, f: impl FnOnce(&MonitorConfig) -> MonitorConfig) {
        let _writer = self
            .state
            .config_writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = f(&self.state.config.load_full());
        self.state.config.store(Arc::new(next));
    }
}
