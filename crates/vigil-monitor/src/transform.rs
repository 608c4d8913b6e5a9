// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the history record and notification payload for an accepted
//! message.
//!
//! The notification body is enriched with attachment links and embed text;
//! the history record mirrors the raw message text and keeps attachments
//! and embeds as structured fields.

use vigil_core::types::{
    FilterConfig, HistoryRecord, InboundMessage, NotificationConfig, NotificationPayload,
};

use crate::filter::has_image_extension;

/// Pure transformation of one accepted message. Does not mutate the input;
/// identical inputs produce structurally identical outputs.
///
/// Attachments are walked in original order: image-extension matches
/// contribute their URL to the payload's image list, everything else
/// becomes a `📎` link line in the body. Embeds follow, in order: titles
/// (with optional descriptions) become `📌` lines, embed images are
/// appended to the image list after all attachment images.
pub fn transform(
    message: &InboundMessage,
    filters: &FilterConfig,
    notifications: &NotificationConfig,
) -> (HistoryRecord, NotificationPayload) {
    let channel_label = message.channel_label();
    let author_label = message.author_label();

    let mut body = format!("{author_label}: {}", message.text);
    let mut image_urls = Vec::new();

    for attachment in &message.attachments {
        if has_image_extension(&attachment.filename, &filters.image_extensions) {
            image_urls.push(attachment.url.clone());
        } else {
            body.push_str(&format!("\n📎 {}", attachment.url));
        }
    }

    for embed in &message.embeds {
        if let Some(title) = &embed.title {
            body.push_str(&format!("\n📌 {title}"));
            if let Some(description) = &embed.description {
                body.push_str(&format!(": {description}"));
            }
        }
        if let Some(image_url) = &embed.image_url {
            image_urls.push(image_url.clone());
        }
    }

    let title = render_title(
        notifications.title_template.as_deref(),
        &channel_label,
        &author_label,
    );

    let record = HistoryRecord {
        timestamp: message.received_at,
        channel: channel_label,
        author: author_label,
        content: message.text.clone(),
        attachments: message.attachments.iter().map(|a| a.url.clone()).collect(),
        embeds: message
            .embeds
            .iter()
            .map(|e| vigil_core::types::EmbedSummary {
                title: e.title.clone(),
                description: e.description.clone(),
            })
            .collect(),
    };

    let payload = NotificationPayload {
        title: Some(title),
        body,
        image_urls,
        priority: notifications.priority,
        sound: notifications.sound.clone(),
    };

    (record, payload)
}

/// Title from the configured template (`{channel}` / `{author}`
/// placeholders) or the channel label when no template is set.
fn render_title(template: Option<&str>, channel_label: &str, author_label: &str) -> String {
    match template {
        Some(template) => template
            .replace("{channel}", channel_label)
            .replace("{author}", author_label),
        None => channel_label.to_string(),
    }
}
