// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content filter deciding whether an in-scope message is relevant.
//!
//! Pure decision function over a message and a filter snapshot; no side
//! effects, safe to call concurrently.

use std::collections::BTreeSet;

use vigil_core::types::{FilterConfig, InboundMessage};

/// Returns true when the message passes the filter.
///
/// A disabled filter matches everything (fail-open). Otherwise a message
/// matches when any of these hold:
/// - a keyword occurs case-insensitively anywhere in the text
/// - a link pattern occurs as a plain substring of a whitespace-delimited
///   token (not URL-aware; cheap by design)
/// - an attachment filename carries a configured image extension
/// - the message has embeds while any content-shape filter (link patterns
///   or image extensions) is active
pub fn matches(message: &InboundMessage, filters: &FilterConfig) -> bool {
    if !filters.enabled {
        return true;
    }

    let text_lower = message.text.to_lowercase();
    if filters
        .keywords
        .iter()
        .any(|keyword| text_lower.contains(&keyword.to_lowercase()))
    {
        return true;
    }

    if !filters.link_patterns.is_empty()
        && message.text.split_whitespace().any(|token| {
            filters
                .link_patterns
                .iter()
                .any(|pattern| token.contains(pattern.as_str()))
        })
    {
        return true;
    }

    if message
        .attachments
        .iter()
        .any(|a| has_image_extension(&a.filename, &filters.image_extensions))
    {
        return true;
    }

    // Embeds are treated as possibly relevant whenever any content-shape
    // filter is active.
    if !message.embeds.is_empty()
        && (!filters.link_patterns.is_empty() || !filters.image_extensions.is_empty())
    {
        return true;
    }

    false
}

/// True when `filename` ends with `.{ext}` for any configured extension,
/// case-insensitive. Extensions are stored without the leading dot.
pub(crate) fn has_image_extension(filename: &str, extensions: &BTreeSet<String>) -> bool {
    let lower = filename.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vigil_core::types::{Attachment, ChannelId, Embed, UserId};

    use super::*;

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            channel_id: ChannelId(1),
            guild_name: "Guild".into(),
            channel_name: "general".into(),
            author_id: UserId(10),
            author_display_name: "Alice".into(),
            author_handle: "alice".into(),
            text: text.into(),
            attachments: vec![],
            embeds: vec![],
            received_at: Utc::now(),
        }
    }

    fn filters() -> FilterConfig {
        FilterConfig::default()
    }

    #[test]
    fn disabled_filter_matches_everything() {
        let config = FilterConfig {
            enabled: false,
            keywords: ["nomatch".to_string()].into_iter().collect(),
            ..FilterConfig::default()
        };
        assert!(matches(&message("completely unrelated"), &config));
        assert!(matches(&message(""), &config));
    }

    #[test]
    fn keyword_matches_case_insensitively() {
        let config = FilterConfig {
            keywords: ["Check".to_string()].into_iter().collect(),
            ..filters()
        };
        assert!(matches(&message("please CHECK this out"), &config));
        assert!(matches(&message("recheck everything"), &config));
        assert!(!matches(&message("nothing here"), &config));
    }

    #[test]
    fn link_pattern_matches_within_token() {
        let config = FilterConfig {
            link_patterns: ["example.com".to_string()].into_iter().collect(),
            ..filters()
        };
        assert!(matches(&message("see https://example.com/page now"), &config));
        assert!(!matches(&message("example separated com"), &config));
    }

    #[test]
    fn image_attachment_matches() {
        let config = filters();
        let mut msg = message("no keywords");
        msg.attachments.push(Attachment {
            url: "https://cdn.example/a".into(),
            filename: "Photo.PNG".into(),
        });
        assert!(matches(&msg, &config));
    }

    #[test]
    fn non_image_attachment_does_not_match() {
        let config = FilterConfig {
            keywords: ["k".to_string()].into_iter().collect(),
            link_patterns: BTreeSet::new(),
            ..filters()
        };
        let mut msg = message("nothing relevant");
        msg.attachments.push(Attachment {
            url: "https://cdn.example/doc".into(),
            filename: "report.pdf".into(),
        });
        assert!(!matches(&msg, &config));
    }

    #[test]
    fn embed_matches_when_content_filters_active() {
        let config = filters(); // default image extensions are non-empty
        let mut msg = message("plain");
        msg.embeds.push(Embed::default());
        assert!(matches(&msg, &config));
    }

    #[test]
    fn embed_does_not_match_without_content_filters() {
        let config = FilterConfig {
            keywords: ["kw".to_string()].into_iter().collect(),
            link_patterns: BTreeSet::new(),
            image_extensions: BTreeSet::new(),
            ..filters()
        };
        let mut msg = message("plain");
        msg.embeds.push(Embed::default());
        assert!(!matches(&msg, &config));
    }

    #[test]
    fn no_criteria_means_no_match() {
        let config = filters();
        assert!(!matches(&message("plain text, no links, no media"), &config));
    }

    #[test]
    fn extension_match_requires_dot_boundary() {
        let exts: BTreeSet<String> = ["png".to_string()].into_iter().collect();
        assert!(has_image_extension("shot.png", &exts));
        assert!(has_image_extension("SHOT.PNG", &exts));
        assert!(!has_image_extension("shotpng", &exts));
    }
}
