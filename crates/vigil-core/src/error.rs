// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vigil channel monitor.

use thiserror::Error;

use crate::types::ChannelId;

/// The primary error type used across Vigil crates.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration errors (missing required settings, invalid values).
    /// Fatal: the process exits before the monitor session starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configured channel id could not be resolved through the gateway.
    /// Non-fatal per id; the session fails only when every id is unresolvable.
    #[error("could not resolve channel {id}")]
    ChannelResolution { id: ChannelId },

    /// None of the configured channel ids resolved at startup. Terminal for
    /// the session.
    #[error("no monitored channels could be resolved")]
    NoChannelsResolved,

    /// Gateway transport errors (event stream closed, adapter failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification delivery failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Unexpected failure while handling a single message. Isolated to that
    /// message; the session keeps running.
    #[error("message processing error: {0}")]
    Processing(String),

    /// Internal or unexpected errors (control API bind failures and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from the notification dispatch path.
///
/// One value describes a single HTTP interaction going wrong -- the push API
/// rejecting a request, an image download failing, or the request never
/// reaching the API. Aggregated per payload in
/// [`DispatchReport`](crate::types::DispatchReport).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The push API answered with a non-2xx status.
    #[error("push API rejected request ({status}): {body}")]
    RemoteRejected { status: u16, body: String },

    /// An attachment image could not be downloaded.
    #[error("failed to fetch image {url}")]
    ImageFetch {
        url: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request never reached the push API.
    #[error("push transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
