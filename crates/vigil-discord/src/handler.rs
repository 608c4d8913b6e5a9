// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serenity event handler forwarding gateway lifecycle events.
//!
//! Maps serenity callbacks onto [`GatewayEvent`]s and Discord messages onto
//! the channel-agnostic [`InboundMessage`]. Connection management stays
//! inside serenity.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serenity::all::{
    ConnectionStage, Context, EventHandler, Message, Ready, ResumedEvent, ShardStageUpdateEvent,
};
use serenity::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use vigil_core::types::{Attachment, ChannelId, Embed, GatewayEvent, InboundMessage, UserId};

/// Forwards serenity events into the adapter's event channel and publishes
/// the serenity [`Context`] for channel resolution.
pub(crate) struct EventForwarder {
    pub(crate) tx: mpsc::Sender<GatewayEvent>,
    pub(crate) context: Arc<RwLock<Option<Context>>>,
}

impl EventForwarder {
    fn publish_context(&self, ctx: Context) {
        *self
            .context
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(ctx);
    }

    async fn forward(&self, event: GatewayEvent) {
        if self.tx.send(event).await.is_err() {
            warn!("event channel closed, dropping gateway event");
        }
    }
}

#[async_trait]
impl EventHandler for EventForwarder {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot = ready.user.name.as_str(),
            guilds = ready.guilds.len(),
            "discord gateway ready"
        );
        self.publish_context(ctx);
        self.forward(GatewayEvent::Ready).await;
    }

    async fn resume(&self, ctx: Context, _resumed: ResumedEvent) {
        // A resumed session re-delivers the ready signal so the monitor
        // re-enters its ready path.
        info!("discord gateway session resumed");
        self.publish_context(ctx);
        self.forward(GatewayEvent::Ready).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent notification loops.
        if msg.author.bot {
            return;
        }

        let (guild_name, channel_name) = channel_names(&ctx, &msg);
        let inbound = to_inbound(&msg, guild_name, channel_name);
        self.forward(GatewayEvent::Message(Box::new(inbound))).await;
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        debug!(stage = ?event.new, "discord shard stage update");
        if event.new == ConnectionStage::Disconnected {
            self.forward(GatewayEvent::Disconnected).await;
        }
    }
}

/// Guild and channel names from the serenity cache; empty strings when the
/// cache has no entry (DMs, or a cold cache).
fn channel_names(ctx: &Context, msg: &Message) -> (String, String) {
    if let Some(guild_id) = msg.guild_id
        && let Some(guild) = ctx.cache.guild(guild_id)
    {
        let channel_name = guild
            .channels
            .get(&msg.channel_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        return (guild.name.clone(), channel_name);
    }
    (String::new(), String::new())
}

/// Maps a Discord message onto the channel-agnostic inbound form.
fn to_inbound(msg: &Message, guild_name: String, channel_name: String) -> InboundMessage {
    InboundMessage {
        channel_id: ChannelId(msg.channel_id.get()),
        guild_name,
        channel_name,
        author_id: UserId(msg.author.id.get()),
        author_display_name: display_name(msg.author.global_name.clone(), &msg.author.name),
        author_handle: msg.author.name.clone(),
        text: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| Attachment {
                url: a.url.clone(),
                filename: a.filename.clone(),
            })
            .collect(),
        embeds: msg
            .embeds
            .iter()
            .map(|e| Embed {
                title: e.title.clone(),
                description: e.description.clone(),
                image_url: e.image.as_ref().map(|i| i.url.clone()),
            })
            .collect(),
        received_at: Utc::now(),
    }
}

/// Display name falls back to the account handle when no global name is set.
fn display_name(global_name: Option<String>, handle: &str) -> String {
    global_name.unwrap_or_else(|| handle.to_string())
}
