// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Ombuds intake bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of a chat participant. Unique key for sessions and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message delivered through a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// The fixed closed set of report categories, with their Uzbek labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum ReportCategory {
    #[strum(serialize = "Diniy")]
    Diniy,
    #[strum(serialize = "Korrupsiya")]
    Korrupsiya,
    #[strum(serialize = "Yer oldi-sotdi")]
    YerOldiSotdi,
    #[strum(serialize = "Migratsiya")]
    Migratsiya,
    #[strum(serialize = "Boshqa mavzu")]
    BoshqaMavzu,
}

impl ReportCategory {
    /// All categories, in the order presented to the user.
    pub const ALL: [ReportCategory; 5] = [
        ReportCategory::Diniy,
        ReportCategory::Korrupsiya,
        ReportCategory::YerOldiSotdi,
        ReportCategory::Migratsiya,
        ReportCategory::BoshqaMavzu,
    ];

    /// Emoji-decorated button label shown on the category keyboard.
    /// The plain category value (`Display`) is used as the callback tag.
    pub fn button_label(&self) -> &'static str {
        match self {
            ReportCategory::Diniy => "🕌 Diniy",
            ReportCategory::Korrupsiya => "💸 Korrupsiya",
            ReportCategory::YerOldiSotdi => "🏡 Yer oldi-sotdi",
            ReportCategory::Migratsiya => "🌍 Migratsiya",
            ReportCategory::BoshqaMavzu => "📝 Boshqa mavzu",
        }
    }
}

/// A persisted submission. Append-only: once written, never mutated.
///
/// All fields except `user_id` are optional so that partial rows written by
/// earlier versions of the bot keep working: `/show` filters on `category`
/// being present, and the recipient directory tolerates missing values.
/// `user_id` is retained even for secret submissions; the secrecy flag is a
/// display convention for the admin, not storage-level anonymization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub category: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub message: Option<String>,
    pub is_secret: Option<bool>,
    /// Submission time, RFC 3339.
    pub submitted_at: Option<String>,
    pub user_id: i64,
    /// Optional public handle of the submitter.
    pub username: Option<String>,
}

/// Contact answer collected during the intake flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    /// Phone number or free-text contact.
    pub value: String,
    /// Public handle, captured only when the contact was shared via the
    /// platform's contact control.
    pub username: Option<String>,
}

/// One deduplicated recipient in the admin `/send` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub user_id: i64,
    pub name: String,
    pub contact: String,
    pub last_category: String,
    /// Most recent submission timestamp seen for this user, RFC 3339.
    pub last_seen: Option<String>,
}

/// Position in the conversation, with the answers accumulated so far.
///
/// Each variant carries exactly the data collected up to that step, so an
/// out-of-step field combination (say, a selected recipient outside the
/// admin compose step) cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// `/start` was sent; waiting for a category button press.
    SelectingCategory,
    EnteringName {
        category: ReportCategory,
    },
    EnteringContact {
        category: ReportCategory,
        name: String,
    },
    EnteringMessage {
        category: ReportCategory,
        name: String,
        contact: ContactInfo,
    },
    ConfirmingSecret {
        category: ReportCategory,
        name: String,
        contact: ContactInfo,
        message: String,
    },
    /// `/admin` was sent; waiting for the shared password.
    AdminPendingPassword,
    /// Password accepted; no admin sub-flow in progress.
    AdminIdle,
    AdminSelectingUser {
        directory: Vec<DirectoryEntry>,
    },
    AdminWritingMessage {
        recipient: DirectoryEntry,
    },
}

impl SessionState {
    /// Whether this state belongs to an authenticated admin.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            SessionState::AdminIdle
                | SessionState::AdminSelectingUser { .. }
                | SessionState::AdminWritingMessage { .. }
        )
    }
}

/// Per-user in-memory conversational state. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: SessionState,
    /// Stamped on every transition; used by the idle-session sweep.
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Creates a session in the given state with `last_activity` = now.
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            last_activity: Utc::now(),
        }
    }
}

/// An inbound event received from a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub user_id: UserId,
    /// Optional public handle of the sender.
    pub username: Option<String>,
    pub payload: EventPayload,
}

/// What the user actually did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// A `/command`, lowercased, without the leading slash or bot mention.
    Command(String),
    /// An inline button press carrying an opaque tag. `message_id` is the
    /// message the keyboard was attached to, when the platform provides it.
    ButtonPressed {
        tag: String,
        message_id: Option<MessageId>,
    },
    /// Free text that is not a command.
    Text(String),
    /// A shared contact card.
    ContactShared { phone: String },
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: UserId,
    pub text: String,
    pub keyboard: Keyboard,
}

impl OutboundMessage {
    /// Plain text message with no keyboard change.
    pub fn text(chat_id: UserId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyboard {
    /// No keyboard change.
    None,
    /// Inline buttons, one `Vec` per row.
    Inline(Vec<Vec<InlineButton>>),
    /// One-time reply keyboard with a single contact-share button.
    RequestContact { label: String },
    /// Remove any custom reply keyboard.
    Remove,
}

/// A single inline button: visible label plus opaque callback tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub tag: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_value_round_trips() {
        for category in ReportCategory::ALL {
            let value = category.to_string();
            let parsed = ReportCategory::from_str(&value).expect("should parse back");
            assert_eq!(category, parsed);
        }
    }

    #[test]
    fn category_values_match_fixed_labels() {
        assert_eq!(ReportCategory::Korrupsiya.to_string(), "Korrupsiya");
        assert_eq!(ReportCategory::YerOldiSotdi.to_string(), "Yer oldi-sotdi");
        assert_eq!(ReportCategory::BoshqaMavzu.to_string(), "Boshqa mavzu");
    }

    #[test]
    fn button_labels_carry_the_plain_value() {
        for category in ReportCategory::ALL {
            assert!(
                category.button_label().ends_with(&category.to_string()),
                "label {} should end with {}",
                category.button_label(),
                category
            );
        }
    }

    #[test]
    fn unknown_category_does_not_parse() {
        assert!(ReportCategory::from_str("secret_yes").is_err());
        assert!(ReportCategory::from_str("").is_err());
    }

    #[test]
    fn admin_states_are_admin() {
        assert!(SessionState::AdminIdle.is_admin());
        assert!(
            SessionState::AdminSelectingUser { directory: vec![] }.is_admin()
        );
        assert!(!SessionState::AdminPendingPassword.is_admin());
        assert!(!SessionState::SelectingCategory.is_admin());
    }

    #[test]
    fn new_session_is_recent() {
        let session = Session::new(SessionState::SelectingCategory);
        let age = Utc::now() - session.last_activity;
        assert!(age.num_seconds() < 5);
    }

    #[test]
    fn submission_record_serde_round_trip() {
        let record = SubmissionRecord {
            category: Some("Korrupsiya".into()),
            name: Some("Ali Valiyev".into()),
            contact: Some("+998901234567".into()),
            message: Some("Pora so'raldi".into()),
            is_secret: Some(true),
            submitted_at: Some("2026-01-01T00:00:00Z".into()),
            user_id: 42,
            username: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: SubmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
