// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord gateway adapter for Vigil.
//!
//! Implements [`ChatGateway`] over serenity. The serenity client owns the
//! connection lifecycle (handshake, heartbeats, reconnection); this crate
//! only forwards lifecycle events and resolves channel handles.

mod handler;

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serenity::all::{Context, GatewayIntents};
use serenity::Client;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use vigil_core::error::VigilError;
use vigil_core::traits::ChatGateway;
use vigil_core::types::{ChannelHandle, ChannelId, GatewayEvent};

use crate::handler::EventForwarder;

/// Discord gateway adapter implementing [`ChatGateway`].
pub struct DiscordGateway {
    token: String,
    events_tx: mpsc::Sender<GatewayEvent>,
    events_rx: Mutex<mpsc::Receiver<GatewayEvent>>,
    /// Serenity context, published by the event handler on ready.
    context: Arc<RwLock<Option<Context>>>,
    client_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl DiscordGateway {
    /// Creates an adapter for the given bot token.
    pub fn new(token: impl Into<String>) -> Result<Self, VigilError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(VigilError::Config(
                "gateway.token cannot be empty".into(),
            ));
        }

        let (events_tx, events_rx) = mpsc::channel(100);
        Ok(Self {
            token,
            events_tx,
            events_rx: Mutex::new(events_rx),
            context: Arc::new(RwLock::new(None)),
            client_handle: Mutex::new(None),
        })
    }

    /// Gateway intents required to observe guild messages with content.
    fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    fn current_context(&self) -> Option<Context> {
        self.context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    fn name(&self) -> &str {
        "discord"
    }

    async fn connect(&mut self) -> Result<(), VigilError> {
        let mut handle = self.client_handle.lock().await;
        if handle.is_some() {
            return Ok(()); // Already connected
        }

        let forwarder = EventForwarder {
            tx: self.events_tx.clone(),
            context: Arc::clone(&self.context),
        };

        let mut client = Client::builder(&self.token, Self::intents())
            .event_handler(forwarder)
            .await
            .map_err(|e| VigilError::Gateway {
                message: format!("failed to build discord client: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!("starting discord gateway client");
        let tx = self.events_tx.clone();
        *handle = Some(tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!(error = %e, "discord client stopped");
                let _ = tx
                    .send(GatewayEvent::Error(format!("discord client stopped: {e}")))
                    .await;
            }
        }));

        Ok(())
    }

    async fn next_event(&self) -> Result<GatewayEvent, VigilError> {
        let mut rx = self.events_rx.lock().await;
        rx.recv().await.ok_or_else(|| VigilError::Gateway {
            message: "discord event channel closed".into(),
            source: None,
        })
    }

    async fn resolve_channel(&self, id: ChannelId) -> Option<ChannelHandle> {
        if id.0 == 0 {
            return None;
        }
        let ctx = self.current_context()?;
        let channel_id = serenity::all::ChannelId::new(id.0);

        // Cache first; the GUILDS intent keeps it populated.
        for guild_id in ctx.cache.guilds() {
            if let Some(guild) = ctx.cache.guild(guild_id)
                && let Some(channel) = guild.channels.get(&channel_id)
            {
                return Some(ChannelHandle {
                    id,
                    guild_name: guild.name.clone(),
                    name: channel.name.clone(),
                });
            }
        }

        // HTTP fallback for channels not yet cached.
        let channel = ctx.http.get_channel(channel_id).await.ok()?;
        let guild_channel = channel.guild()?;
        let guild_name = guild_channel
            .guild_id
            .to_partial_guild(&ctx.http)
            .await
            .map(|g| g.name)
            .unwrap_or_default();

        Some(ChannelHandle {
            id,
            guild_name,
            name: guild_channel.name,
        })
    }

    async fn shutdown(&self) -> Result<(), VigilError> {
        let mut handle = self.client_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        Ok(())
    }
}
