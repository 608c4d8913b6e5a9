// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier capturing dispatched payloads for assertion in tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use vigil_core::error::DispatchError;
use vigil_core::traits::Notifier;
use vigil_core::types::{DispatchReport, NotificationPayload};

/// A mock push notifier.
///
/// Records every payload passed to `notify()`. Optionally sleeps before
/// recording (to test dispatch-vs-history ordering) or reports every
/// request as failed (to test the error-notice path).
pub struct MockNotifier {
    sent: Mutex<Vec<NotificationPayload>>,
    delay: Option<Duration>,
    fail_all: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            delay: None,
            fail_all: false,
        }
    }

    /// A notifier that sleeps before completing each dispatch.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// A notifier whose every request fails.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new()
        }
    }

    /// All payloads passed to `notify()` so far, in order.
    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> DispatchReport {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());

        // One request for a text-only payload, one per image otherwise.
        let mut report = DispatchReport::default();
        if payload.image_urls.is_empty() {
            if self.fail_all {
                report.record_failure(
                    None,
                    DispatchError::Transport {
                        message: "mock notifier failure".into(),
                        source: None,
                    },
                );
            } else {
                report.record_success();
            }
        } else {
            for url in &payload.image_urls {
                if self.fail_all {
                    report.record_failure(
                        Some(url.clone()),
                        DispatchError::Transport {
                            message: "mock notifier failure".into(),
                            source: None,
                        },
                    );
                } else {
                    report.record_success();
                }
            }
        }
        report
    }
}
