// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the monitor pipeline, the dispatch path, and the
//! control API.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::DispatchError;

/// Unique identifier of a chat channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a message author.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Notification priority, mapped onto the Pushover -2..2 integer scale.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Emergency,
}

impl Priority {
    /// The integer value the push API expects.
    pub fn api_value(self) -> i8 {
        match self {
            Priority::Lowest => -2,
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Emergency => 2,
        }
    }
}

/// Content filter applied to every in-scope message.
///
/// When `enabled` is false every message matches (fail-open). Extensions are
/// stored without a leading dot; matching is on the `.ext` suffix,
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default = "default_filter_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub keywords: BTreeSet<String>,

    #[serde(default)]
    pub link_patterns: BTreeSet<String>,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: default_filter_enabled(),
            keywords: BTreeSet::new(),
            link_patterns: BTreeSet::new(),
            image_extensions: default_image_extensions(),
        }
    }
}

fn default_filter_enabled() -> bool {
    true
}

fn default_image_extensions() -> BTreeSet<String> {
    ["jpg", "jpeg", "png", "gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// How matched messages are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    #[serde(default)]
    pub priority: Priority,

    #[serde(default = "default_sound")]
    pub sound: String,

    /// Optional notification title template. Supports `{channel}` and
    /// `{author}` placeholders; when unset the channel label is used.
    #[serde(default)]
    pub title_template: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            sound: default_sound(),
            title_template: None,
        }
    }
}

fn default_sound() -> String {
    "pushover".to_string()
}

/// Which channels and authors are in scope.
///
/// A message is monitored only when its channel AND its author are members
/// of the respective sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default)]
    pub channel_ids: BTreeSet<ChannelId>,

    #[serde(default)]
    pub user_ids: BTreeSet<UserId>,
}

impl RoutingConfig {
    pub fn is_monitored(&self, channel: ChannelId, author: UserId) -> bool {
        self.channel_ids.contains(&channel) && self.user_ids.contains(&author)
    }
}

/// A file attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
}

/// An embed carried by an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A message as delivered by the gateway collaborator. Read-only view; the
/// pipeline never mutates it.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: ChannelId,
    pub guild_name: String,
    pub channel_name: String,
    pub author_id: UserId,
    pub author_display_name: String,
    pub author_handle: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// `"{guild} - #{channel}"`, the label shown in titles and history.
    pub fn channel_label(&self) -> String {
        format!("{} - #{}", self.guild_name, self.channel_name)
    }

    /// `"{display_name} (@{handle})"`.
    pub fn author_label(&self) -> String {
        format!("{} (@{})", self.author_display_name, self.author_handle)
    }
}

/// A monitored channel resolved to a live gateway handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: ChannelId,
    pub guild_name: String,
    pub name: String,
}

impl ChannelHandle {
    pub fn label(&self) -> String {
        format!("{} - #{}", self.guild_name, self.name)
    }
}

/// Lifecycle events delivered by the gateway collaborator as a single
/// logical stream.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// Handshake complete; channels can be resolved.
    Ready,
    /// A message arrived in a visible channel.
    Message(Box<InboundMessage>),
    /// Connection lost; the transport reconnects on its own.
    Disconnected,
    /// A transport-level error worth surfacing.
    Error(String),
}

/// Title/description pair kept for an embed in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedSummary {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Normalized, immutable record of an accepted message, kept for dashboard
/// display. Content mirrors the raw message text; attachment URLs and embed
/// summaries are stored structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub author: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub embeds: Vec<EmbedSummary>,
}

/// Everything needed to deliver one notification. Built once per accepted
/// message; immutable after construction.
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: String,
    pub image_urls: Vec<String>,
    pub priority: Priority,
    pub sound: String,
}

impl NotificationPayload {
    /// A text-only payload for startup/status/error notices.
    pub fn text_only(
        body: impl Into<String>,
        title: impl Into<String>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            title: Some(title.into()),
            body: body.into(),
            image_urls: Vec::new(),
            priority: config.priority,
            sound: config.sound.clone(),
        }
    }
}

/// One image (or the text-only request) failing during dispatch.
#[derive(Debug)]
pub struct DispatchFailure {
    /// The image URL this failure belongs to; `None` for the text-only
    /// request.
    pub image_url: Option<String>,
    pub error: DispatchError,
}

/// Aggregate outcome of dispatching one payload. Partial failure of a
/// multi-image fan-out is not a whole-operation failure.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn record_success(&mut self) {
        self.delivered += 1;
    }

    pub fn record_failure(&mut self, image_url: Option<String>, error: DispatchError) {
        self.failures.push(DispatchFailure { image_url, error });
    }

    /// True when every request of the fan-out succeeded.
    pub fn fully_delivered(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of requests attempted (successes plus failures).
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}
