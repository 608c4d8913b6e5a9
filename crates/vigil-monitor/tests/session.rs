// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session orchestration integration tests.
//!
//! These exercise `MonitorSession` through the shared `SessionHarness`.
//! They live here (not as an inline `#[cfg(test)]` module) because the
//! harness comes from `vigil-test-utils`, which itself depends on
//! `vigil-monitor`; an integration test links a single copy of this crate
//! and so avoids the dev-dependency cycle's duplicate-type mismatch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use vigil_core::error::VigilError;
use vigil_core::types::{
    Attachment, ChannelHandle, ChannelId, FilterConfig, GatewayEvent, InboundMessage,
    NotificationConfig, Priority, RoutingConfig, UserId,
};
use vigil_monitor::MonitorConfig;
use vigil_test_utils::harness::{wait_until, SessionHarness};
use vigil_test_utils::{MockGateway, MockNotifier};


fn monitored_config() -> MonitorConfig {
    MonitorConfig {
        routing: RoutingConfig {
            channel_ids: [ChannelId(1)].into_iter().collect(),
            user_ids: [UserId(10)].into_iter().collect(),
        },
        filters: FilterConfig::default(),
        notifications: NotificationConfig::default(),
    }
}

fn message(channel: u64, author: u64, text: &str) -> InboundMessage {
    InboundMessage {
        channel_id: ChannelId(channel),
        guild_name: "Guild".into(),
        channel_name: "general".into(),
        author_id: UserId(author),
        author_display_name: "Alice".into(),
        author_handle: "alice".into(),
        text: text.into(),
        attachments: vec![],
        embeds: vec![],
        received_at: Utc::now(),
    }
}

#[tokio::test]
async fn ready_resolves_channels_and_notifies() {
    let harness = SessionHarness::start_ready(monitored_config()).await;

    assert!(harness.handle.is_initialized());
    assert!(harness.handle.is_connected());
    let channels = harness.handle.channels();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].id, ChannelId(1));

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Monitor started successfully"));
    assert!(sent[0].body.contains(&channels[0].label()));

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn all_channels_unresolvable_is_terminal() {
    let gateway = Arc::new(MockGateway::new()); // no channels registered
    let notifier = Arc::new(MockNotifier::new());
    let harness = SessionHarness::start_with(
        monitored_config(),
        Arc::clone(&gateway),
        Arc::clone(&notifier),
    )
    .await;

    gateway.inject(GatewayEvent::Ready).await;

    let result = harness.into_result().await;
    assert!(matches!(result, Err(VigilError::NoChannelsResolved)));

    // Failure notice sent, but no startup notification.
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Could not resolve"));
}

#[tokio::test]
async fn accepted_message_is_recorded_and_dispatched() {
    let harness = SessionHarness::start_ready(monitored_config()).await;
    harness.notifier.clear();

    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(message(
            1,
            10,
            "check this out",
        ))))
        .await;

    assert!(
        wait_until(|| harness.handle.history().len() == 1).await,
        "history should gain the accepted message"
    );
    let records = harness.handle.history();
    assert_eq!(records[0].content, "check this out");

    assert!(wait_until(|| harness.notifier.sent_count() == 1).await);
    let sent = harness.notifier.sent();
    assert!(sent[0].body.starts_with("Alice (@alice): check this out"));

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn unmonitored_channel_is_silently_dropped() {
    let harness = SessionHarness::start_ready(monitored_config()).await;
    harness.notifier.clear();

    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(message(2, 10, "hello"))))
        .await;
    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(message(1, 99, "hello"))))
        .await;

    // Give the loop a moment; nothing should land anywhere.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(harness.handle.history().is_empty());
    assert_eq!(harness.notifier.sent_count(), 0);

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn filtered_message_passes_after_filters_disabled() {
    let mut config = monitored_config();
    config.filters.keywords = ["launch".to_string()].into_iter().collect();
    config.filters.image_extensions.clear();
    config.filters.link_patterns.clear();
    let harness = SessionHarness::start_ready(config).await;
    harness.notifier.clear();

    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(message(1, 10, "no match"))))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(harness.handle.history().is_empty());

    harness.handle.set_filters(FilterConfig {
        enabled: false,
        ..FilterConfig::default()
    });
    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(message(1, 10, "no match"))))
        .await;

    assert!(wait_until(|| harness.handle.history().len() == 1).await);

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn disconnect_flips_liveness_and_notifies() {
    let harness = SessionHarness::start_ready(monitored_config()).await;
    harness.notifier.clear();

    harness.gateway.inject(GatewayEvent::Disconnected).await;

    assert!(wait_until(|| !harness.handle.is_connected()).await);
    assert!(wait_until(|| harness.notifier.sent_count() == 1).await);
    let sent = harness.notifier.sent();
    assert!(sent[0].body.contains("Disconnected"));
    // Still initialized: the control API keeps answering.
    assert!(harness.handle.is_initialized());

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn history_is_appended_before_dispatch_completes() {
    let gateway = Arc::new(MockGateway::new());
    gateway.register_channel(ChannelHandle {
        id: ChannelId(1),
        guild_name: "Guild".into(),
        name: "general".into(),
    });
    let notifier = Arc::new(MockNotifier::with_delay(Duration::from_millis(800)));
    let harness = SessionHarness::start_with(
        monitored_config(),
        Arc::clone(&gateway),
        Arc::clone(&notifier),
    )
    .await;
    gateway.inject(GatewayEvent::Ready).await;
    assert!(wait_until(|| harness.handle.is_initialized()).await);

    gateway
        .inject(GatewayEvent::Message(Box::new(message(1, 10, "ordered"))))
        .await;

    // The record must be visible while the (slow) dispatch is in flight.
    assert!(wait_until(|| harness.handle.history().len() == 1).await);
    assert_eq!(notifier.sent_count(), 0);

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn dispatch_failure_triggers_error_notice() {
    let gateway = Arc::new(MockGateway::new());
    gateway.register_channel(ChannelHandle {
        id: ChannelId(1),
        guild_name: "Guild".into(),
        name: "general".into(),
    });
    let notifier = Arc::new(MockNotifier::failing());
    let harness = SessionHarness::start_with(
        monitored_config(),
        Arc::clone(&gateway),
        Arc::clone(&notifier),
    )
    .await;
    gateway.inject(GatewayEvent::Ready).await;
    assert!(wait_until(|| harness.handle.is_initialized()).await);
    // Let the startup notification land before clearing.
    assert!(wait_until(|| notifier.sent_count() == 1).await);
    notifier.clear();

    gateway
        .inject(GatewayEvent::Message(Box::new(message(1, 10, "boom"))))
        .await;

    // Payload attempt plus exactly one error notice, which also failed
    // but is not retried.
    assert!(wait_until(|| notifier.sent_count() == 2).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(notifier.sent_count(), 2);

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn config_updates_are_visible_through_handle() {
    let harness = SessionHarness::start_ready(monitored_config()).await;

    harness.handle.set_notifications(NotificationConfig {
        priority: Priority::Emergency,
        sound: "siren".into(),
        title_template: None,
    });
    harness.handle.set_users(vec![UserId(7), UserId(8)]);

    let config = harness.handle.config();
    assert_eq!(config.notifications.priority, Priority::Emergency);
    assert_eq!(config.notifications.sound, "siren");
    assert!(config.routing.user_ids.contains(&UserId(7)));
    assert!(!config.routing.user_ids.contains(&UserId(10)));

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn set_channels_re_resolves_handles() {
    let harness = SessionHarness::start_ready(monitored_config()).await;
    harness.gateway.register_channel(ChannelHandle {
        id: ChannelId(2),
        guild_name: "Guild".into(),
        name: "alerts".into(),
    });

    harness
        .handle
        .set_channels(vec![ChannelId(2), ChannelId(404)])
        .await;

    let channels = harness.handle.channels();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].name, "alerts");
    let config = harness.handle.config();
    assert!(config.routing.channel_ids.contains(&ChannelId(404)));

    harness.shutdown().await.unwrap();
}

#[tokio::test]
async fn image_attachment_flows_into_payload() {
    let harness = SessionHarness::start_ready(monitored_config()).await;
    harness.notifier.clear();

    let mut msg = message(1, 10, "look");
    msg.attachments.push(Attachment {
        url: "https://cdn.example/shot.png".into(),
        filename: "shot.png".into(),
    });
    harness
        .gateway
        .inject(GatewayEvent::Message(Box::new(msg)))
        .await;

    assert!(wait_until(|| harness.notifier.sent_count() == 1).await);
    let sent = harness.notifier.sent();
    assert_eq!(sent[0].image_urls, vec!["https://cdn.example/shot.png"]);

    harness.shutdown().await.unwrap();
}
