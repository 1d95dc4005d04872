// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete intake stack with a mock channel,
//! temp SQLite report store, and in-memory sessions. Provides helpers to
//! drive the questionnaire and admin flows in tests.

use std::sync::Arc;

use ombuds_config::model::StorageConfig;
use ombuds_core::types::{EventPayload, InboundEvent, MessageId, OutboundMessage, UserId};
use ombuds_core::{OmbudsError, ReportStore, SubmissionRecord};
use ombuds_intake::{ConversationController, InMemorySessionStore};
use ombuds_storage::SqliteReportStore;

use crate::mock_channel::MockChannel;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    admin_chat_id: i64,
    admin_password: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            admin_chat_id: 777,
            admin_password: "test-parol".to_string(),
        }
    }

    /// Override the admin chat id (default 777).
    pub fn with_admin_chat_id(mut self, chat_id: i64) -> Self {
        self.admin_chat_id = chat_id;
        self
    }

    /// Override the admin password (default "test-parol").
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = password.into();
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, OmbudsError> {
        // Create temp directory for SQLite
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| OmbudsError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        // Initialize the SQLite report store
        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let reports = Arc::new(SqliteReportStore::new(storage_config));
        reports.initialize().await?;

        let channel = Arc::new(MockChannel::new());
        let sessions = Arc::new(InMemorySessionStore::new());

        let controller = ConversationController::new(
            channel.clone(),
            reports.clone(),
            sessions.clone(),
            UserId(self.admin_chat_id),
            self.admin_password.clone(),
        );

        Ok(TestHarness {
            channel,
            reports,
            sessions,
            controller,
            admin_chat_id: self.admin_chat_id,
            admin_password: self.admin_password,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock channel and temp storage.
pub struct TestHarness {
    /// The mock channel adapter.
    pub channel: Arc<MockChannel>,
    /// SQLite report store (temp DB, cleaned up on drop).
    pub reports: Arc<SqliteReportStore>,
    /// In-memory session store.
    pub sessions: Arc<InMemorySessionStore>,
    /// The conversation controller under test.
    pub controller: ConversationController,
    /// Chat id that receives admin notifications.
    pub admin_chat_id: i64,
    /// Password accepted by `/admin`.
    pub admin_password: String,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive a command event (name without the leading slash).
    pub async fn send_command(&self, user: i64, name: &str) -> Result<(), OmbudsError> {
        self.controller
            .handle_event(InboundEvent {
                user_id: UserId(user),
                username: None,
                payload: EventPayload::Command(name.to_string()),
            })
            .await
    }

    /// Drive a free-text event.
    pub async fn send_text(&self, user: i64, text: &str) -> Result<(), OmbudsError> {
        self.controller
            .handle_event(InboundEvent {
                user_id: UserId(user),
                username: None,
                payload: EventPayload::Text(text.to_string()),
            })
            .await
    }

    /// Drive an inline button press.
    pub async fn press_button(&self, user: i64, tag: &str) -> Result<(), OmbudsError> {
        self.controller
            .handle_event(InboundEvent {
                user_id: UserId(user),
                username: None,
                payload: EventPayload::ButtonPressed {
                    tag: tag.to_string(),
                    message_id: Some(MessageId("1".into())),
                },
            })
            .await
    }

    /// Drive a shared-contact event with the sender's username attached.
    pub async fn share_contact(
        &self,
        user: i64,
        username: Option<&str>,
        phone: &str,
    ) -> Result<(), OmbudsError> {
        self.controller
            .handle_event(InboundEvent {
                user_id: UserId(user),
                username: username.map(String::from),
                payload: EventPayload::ContactShared {
                    phone: phone.to_string(),
                },
            })
            .await
    }

    /// The most recent reply sent to `user`.
    pub async fn last_reply(&self, user: i64) -> Option<String> {
        self.channel.last_text_to(user).await
    }

    /// All admin notifications delivered so far.
    pub async fn admin_notifications(&self) -> Vec<OutboundMessage> {
        self.channel
            .sent_messages()
            .await
            .into_iter()
            .filter(|m| m.chat_id.0 == self.admin_chat_id)
            .collect()
    }

    /// All persisted submission records.
    pub async fn stored_records(&self) -> Result<Vec<SubmissionRecord>, OmbudsError> {
        self.reports.load_all().await
    }

    /// Path to the temp SQLite database file.
    pub fn database_path(&self) -> String {
        self._temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string()
    }
}
