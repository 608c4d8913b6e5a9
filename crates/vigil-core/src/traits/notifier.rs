// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier collaborator trait for push-notification delivery.

use async_trait::async_trait;

use crate::types::{DispatchReport, NotificationPayload};

/// Delivers notification payloads to a push service.
///
/// `notify` never returns an error: every failure (image fetch, transport,
/// remote rejection) is captured in the report so the caller can log it
/// without the dispatch path ever crashing message handling.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, payload: &NotificationPayload) -> DispatchReport;
}
