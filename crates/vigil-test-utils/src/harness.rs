// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session harness for integration testing.
//!
//! `SessionHarness` assembles a running [`MonitorSession`] over mock
//! collaborators and exposes the pieces tests assert against.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use vigil_core::error::VigilError;
use vigil_core::types::{ChannelHandle, GatewayEvent};
use vigil_monitor::{MonitorConfig, MonitorHandle, MonitorSession};

use crate::mock_gateway::MockGateway;
use crate::mock_notifier::MockNotifier;

/// How long [`wait_until`] polls before giving up.
const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls a predicate until it holds or the timeout elapses.
pub async fn wait_until<F: FnMut() -> bool>(mut predicate: F) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}

/// A monitor session running against mock collaborators.
pub struct SessionHarness {
    pub handle: MonitorHandle,
    pub gateway: Arc<MockGateway>,
    pub notifier: Arc<MockNotifier>,
    cancel: CancellationToken,
    task: JoinHandle<Result<(), VigilError>>,
}

impl SessionHarness {
    /// Spawns a session over the given mocks. No events are injected.
    pub async fn start_with(
        config: MonitorConfig,
        gateway: Arc<MockGateway>,
        notifier: Arc<MockNotifier>,
    ) -> Self {
        let session = MonitorSession::new(
            Arc::clone(&gateway) as Arc<dyn vigil_core::traits::ChatGateway>,
            Arc::clone(&notifier) as Arc<dyn vigil_core::traits::Notifier>,
            config,
        );
        let handle = session.handle();
        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let task = tokio::spawn(async move { session.run(run_cancel).await });

        Self {
            handle,
            gateway,
            notifier,
            cancel,
            task,
        }
    }

    /// Spawns a session with every configured channel resolvable, injects
    /// the ready event, and waits for initialization.
    ///
    /// Registered channels are labeled `Guild - #channel-<id>`.
    pub async fn start_ready(config: MonitorConfig) -> Self {
        let gateway = Arc::new(MockGateway::new());
        for id in &config.routing.channel_ids {
            gateway.register_channel(ChannelHandle {
                id: *id,
                guild_name: "Guild".into(),
                name: format!("channel-{id}"),
            });
        }
        let notifier = Arc::new(MockNotifier::new());
        let harness = Self::start_with(config, gateway, notifier).await;

        harness.gateway.inject(GatewayEvent::Ready).await;
        assert!(
            wait_until(|| harness.handle.is_initialized()).await,
            "session did not reach ready"
        );
        // The startup notification is dispatched from a spawned task; wait
        // for it so tests can clear() deterministically.
        assert!(
            wait_until(|| harness.notifier.sent_count() >= 1).await,
            "startup notification was not sent"
        );
        harness
    }

    /// Cancels the session and returns the run result.
    pub async fn shutdown(self) -> Result<(), VigilError> {
        self.cancel.cancel();
        self.await_task().await
    }

    /// Awaits the session ending on its own (terminal error or stream end).
    pub async fn into_result(self) -> Result<(), VigilError> {
        self.await_task().await
    }

    async fn await_task(self) -> Result<(), VigilError> {
        tokio::time::timeout(WAIT_TIMEOUT, self.task)
            .await
            .expect("monitor session did not stop in time")
            .expect("monitor session task panicked")
    }
}
