// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ombuds intake bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Ombuds workspace. All adapter plugins
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OmbudsError;
pub use types::{
    AdapterType, ContactInfo, DirectoryEntry, EventPayload, HealthStatus, InboundEvent,
    InlineButton, Keyboard, MessageId, OutboundMessage, ReportCategory, Session, SessionState,
    SubmissionRecord, UserId,
};

// Re-export all adapter traits at crate root.
pub use traits::{ChannelAdapter, PluginAdapter, ReportStore, SessionStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ombuds_error_has_all_variants() {
        let _config = OmbudsError::Config("test".into());
        let _storage = OmbudsError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = OmbudsError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = OmbudsError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn user_and_message_ids() {
        let uid = UserId(42);
        let mid = MessageId("msg-1".into());

        assert_eq!(uid, UserId(42));
        assert_eq!(uid.to_string(), "42");

        let mid2 = mid.clone();
        assert_eq!(mid, mid2);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies that the adapter trait modules compile and are
        // accessible through the public API.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_report_store<T: ReportStore>() {}
        fn _assert_session_store<T: SessionStore>() {}
    }
}
