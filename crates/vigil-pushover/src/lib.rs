// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pushover notification dispatcher for Vigil.
//!
//! Implements [`Notifier`] against the Pushover messages API. Text-only
//! payloads go out as a single form-encoded POST; payloads with images fan
//! out into one multipart request per image, because the API accepts at
//! most one binary attachment per message.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use vigil_core::error::{DispatchError, VigilError};
use vigil_core::traits::Notifier;
use vigil_core::types::{DispatchReport, NotificationPayload};

/// Endpoint of the Pushover messages API.
const API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Pushover account credentials.
#[derive(Debug, Clone)]
pub struct PushoverCredentials {
    pub user_key: String,
    pub api_token: String,
}

/// HTTP dispatcher for Pushover notifications.
///
/// `notify` never returns an error; every failed request is captured in
/// the returned [`DispatchReport`]. There is no automatic retry: a failed
/// image request is recorded and the remaining images are still attempted.
pub struct PushoverNotifier {
    client: reqwest::Client,
    credentials: PushoverCredentials,
    api_url: String,
}

impl PushoverNotifier {
    /// Creates a dispatcher with a pooled HTTP client.
    pub fn new(credentials: PushoverCredentials) -> Result<Self, VigilError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VigilError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            api_url: API_URL.to_string(),
        })
    }

    /// Overrides the API URL (for testing with wiremock).
    #[cfg(test)]
    fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }

    /// Form fields common to every request of a payload's fan-out.
    fn base_fields(&self, payload: &NotificationPayload) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("token", self.credentials.api_token.clone()),
            ("user", self.credentials.user_key.clone()),
            ("message", payload.body.clone()),
            ("priority", payload.priority.api_value().to_string()),
            ("sound", payload.sound.clone()),
        ];
        if let Some(title) = &payload.title {
            fields.push(("title", title.clone()));
        }
        fields
    }

    async fn send_text(&self, payload: &NotificationPayload) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.api_url)
            .form(&self.base_fields(payload))
            .send()
            .await
            .map_err(|e| DispatchError::Transport {
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        check_status(response).await
    }

    async fn send_with_image(
        &self,
        payload: &NotificationPayload,
        image_url: &str,
    ) -> Result<(), DispatchError> {
        let image = self.fetch_image(image_url).await?;

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in self.base_fields(payload) {
            form = form.text(key, value);
        }
        let part = reqwest::multipart::Part::bytes(image)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| DispatchError::Transport {
                message: format!("invalid attachment part: {e}"),
                source: Some(Box::new(e)),
            })?;
        form = form.part("attachment", part);

        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DispatchError::Transport {
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        check_status(response).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, DispatchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DispatchError::ImageFetch {
                url: url.to_string(),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(DispatchError::ImageFetch {
                url: url.to_string(),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| DispatchError::ImageFetch {
            url: url.to_string(),
            source: Some(Box::new(e)),
        })?;

        debug!(url, size = bytes.len(), "downloaded attachment image");
        Ok(bytes.to_vec())
    }
}

/// Non-2xx responses become [`DispatchError::RemoteRejected`] carrying the
/// status and the response body.
async fn check_status(response: reqwest::Response) -> Result<(), DispatchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DispatchError::RemoteRejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> DispatchReport {
        let mut report = DispatchReport::default();

        if payload.image_urls.is_empty() {
            match self.send_text(payload).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    warn!(error = %e, "notification send failed");
                    report.record_failure(None, e);
                }
            }
            return report;
        }

        // One request per image; the full body text rides along with every
        // request. A failed image is recorded and the rest still go out.
        for url in &payload.image_urls {
            match self.send_with_image(payload, url).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    warn!(image = url.as_str(), error = %e, "image notification failed");
                    report.record_failure(Some(url.clone()), e);
                }
            }
        }

        report
    }
}
