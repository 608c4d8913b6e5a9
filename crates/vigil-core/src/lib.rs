// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vigil channel monitor.
//!
//! This crate provides the trait definitions, error types, and common types
//! used throughout the Vigil workspace: the gateway and notifier seams, the
//! message/notification data model, and the error taxonomy.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DispatchError, VigilError};
pub use traits::{ChatGateway, Notifier};
pub use types::{
    ChannelHandle, ChannelId, DispatchReport, FilterConfig, GatewayEvent, HistoryRecord,
    InboundMessage, NotificationConfig, NotificationPayload, Priority, RoutingConfig, UserId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vigil_error_has_all_variants() {
        // Verify every error variant can be constructed.
        let _config = VigilError::Config("test".into());
        let _resolution = VigilError::ChannelResolution {
            id: ChannelId(42),
        };
        let _none = VigilError::NoChannelsResolved;
        let _gateway = VigilError::Gateway {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _dispatch = VigilError::Dispatch(DispatchError::RemoteRejected {
            status: 500,
            body: "test".into(),
        });
        let _processing = VigilError::Processing("test".into());
        let _internal = VigilError::Internal("test".into());
    }

    #[test]
    fn dispatch_error_converts_into_vigil_error() {
        let err: VigilError = DispatchError::Transport {
            message: "connection refused".into(),
            source: None,
        }
        .into();
        assert!(matches!(err, VigilError::Dispatch(_)));
    }

    #[test]
    fn channel_resolution_error_names_the_id() {
        let err = VigilError::ChannelResolution { id: ChannelId(99) };
        assert!(err.to_string().contains("99"));
    }
}
