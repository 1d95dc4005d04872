// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user conversation state machine.
//!
//! Maps (current session state, inbound event) to the next state, at most
//! one side effect, and a reply. Commands are dispatched before stepped-flow
//! handling; free text starting with the command marker never counts as a
//! step answer.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use ombuds_core::{
    ChannelAdapter, ContactInfo, EventPayload, InboundEvent, InlineButton, Keyboard, MessageId,
    OmbudsError, OutboundMessage, ReportCategory, ReportStore, Session, SessionState,
    SessionStore, SubmissionRecord, UserId,
};

use crate::directory::build_directory;
use crate::texts;

/// Conversation controller: one inbound event in, one transition out.
///
/// All collaborators are injected so the controller can be exercised with
/// fake stores and channels.
pub struct ConversationController {
    channel: Arc<dyn ChannelAdapter>,
    reports: Arc<dyn ReportStore>,
    sessions: Arc<dyn SessionStore>,
    admin_chat_id: UserId,
    admin_password: String,
}

impl ConversationController {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        reports: Arc<dyn ReportStore>,
        sessions: Arc<dyn SessionStore>,
        admin_chat_id: UserId,
        admin_password: String,
    ) -> Self {
        Self {
            channel,
            reports,
            sessions,
            admin_chat_id,
            admin_password,
        }
    }

    /// Handle one inbound event to completion.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), OmbudsError> {
        match &event.payload {
            EventPayload::Command(cmd) => self.handle_command(&event, &cmd.clone()).await,
            EventPayload::ButtonPressed { tag, message_id } => {
                self.handle_button(&event, &tag.clone(), message_id.clone())
                    .await
            }
            EventPayload::Text(text) => self.handle_text(&event, &text.clone()).await,
            EventPayload::ContactShared { phone } => {
                self.handle_contact(&event, &phone.clone()).await
            }
        }
    }

    // --- Commands ---

    async fn handle_command(&self, event: &InboundEvent, cmd: &str) -> Result<(), OmbudsError> {
        let user_id = event.user_id;
        match cmd {
            "start" => {
                self.sessions
                    .put(user_id, Session::new(SessionState::SelectingCategory));
                self.reply(user_id, texts::WELCOME, category_keyboard()).await
            }
            "admin" => {
                self.sessions
                    .put(user_id, Session::new(SessionState::AdminPendingPassword));
                self.reply(user_id, texts::ENTER_PASSWORD, Keyboard::None)
                    .await
            }
            "help" => {
                // Stateless; does not touch the session.
                self.reply(user_id, texts::HELP, Keyboard::None).await
            }
            "show" => match self.admin_state(user_id) {
                Some(state) => self.admin_show(user_id, state).await,
                None => self.reply(user_id, texts::NOT_ADMIN, Keyboard::None).await,
            },
            "clear" => match self.admin_state(user_id) {
                Some(state) => self.admin_clear(user_id, state).await,
                None => self.reply(user_id, texts::NOT_ADMIN, Keyboard::None).await,
            },
            "send" => match self.admin_state(user_id) {
                Some(_) => self.admin_send(user_id).await,
                None => self.reply(user_id, texts::NOT_ADMIN, Keyboard::None).await,
            },
            other => {
                // Unrecognized commands are left for other bots/handlers.
                debug!(user_id = %user_id, command = other, "ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn admin_show(&self, user_id: UserId, state: SessionState) -> Result<(), OmbudsError> {
        let records = self.load_records().await;
        self.sessions.put(user_id, Session::new(state));

        if records.is_empty() {
            return self
                .reply(user_id, texts::NO_SUBMISSIONS, Keyboard::None)
                .await;
        }

        // Only completed submissions carry a category.
        let complete: Vec<&SubmissionRecord> =
            records.iter().filter(|r| r.category.is_some()).collect();
        if complete.is_empty() {
            return self
                .reply(user_id, texts::NO_COMPLETE_SUBMISSIONS, Keyboard::None)
                .await;
        }

        self.reply(user_id, texts::format_report_list(&complete), Keyboard::None)
            .await
    }

    async fn admin_clear(&self, user_id: UserId, state: SessionState) -> Result<(), OmbudsError> {
        if let Err(e) = self.reports.clear().await {
            warn!(error = %e, "failed to clear submissions");
        }
        self.sessions.put(user_id, Session::new(state));
        self.reply(user_id, texts::CLEARED, Keyboard::None).await
    }

    async fn admin_send(&self, user_id: UserId) -> Result<(), OmbudsError> {
        let records = self.load_records().await;
        if records.is_empty() {
            return self.reply(user_id, texts::NO_USERS, Keyboard::None).await;
        }

        let directory = build_directory(&records);
        if directory.is_empty() {
            return self
                .reply(user_id, texts::EMPTY_DIRECTORY, Keyboard::None)
                .await;
        }

        let listing = texts::format_directory(&directory);
        self.sessions.put(
            user_id,
            Session::new(SessionState::AdminSelectingUser { directory }),
        );
        self.reply(user_id, listing, Keyboard::None).await
    }

    // --- Buttons ---

    async fn handle_button(
        &self,
        event: &InboundEvent,
        tag: &str,
        message_id: Option<MessageId>,
    ) -> Result<(), OmbudsError> {
        let user_id = event.user_id;

        if let Ok(category) = ReportCategory::from_str(tag) {
            // Accepted only at the start of a flow; mid-flow presses on a
            // stale keyboard are no-ops.
            let accepts = match self.sessions.get(user_id) {
                None => true,
                Some(session) => session.state == SessionState::SelectingCategory,
            };
            if !accepts {
                debug!(user_id = %user_id, %category, "ignoring category press mid-flow");
                return Ok(());
            }

            // Best-effort removal of the category keyboard.
            if let Some(mid) = &message_id
                && let Err(e) = self.channel.clear_buttons(user_id, mid).await
            {
                debug!(user_id = %user_id, error = %e, "failed to clear category buttons");
            }

            self.sessions
                .put(user_id, Session::new(SessionState::EnteringName { category }));
            return self.reply(user_id, texts::ENTER_NAME, Keyboard::None).await;
        }

        if tag == "secret_yes" || tag == "secret_no" {
            let Some(session) = self.sessions.get(user_id) else {
                return Ok(());
            };
            let SessionState::ConfirmingSecret {
                category,
                name,
                contact,
                message,
            } = session.state
            else {
                return Ok(());
            };
            return self
                .complete_submission(
                    event,
                    category,
                    name,
                    contact,
                    message,
                    tag == "secret_yes",
                )
                .await;
        }

        debug!(user_id = %user_id, tag, "ignoring unknown button tag");
        Ok(())
    }

    /// Persist the finished submission, notify the admin, confirm to the
    /// user, and delete the session.
    async fn complete_submission(
        &self,
        event: &InboundEvent,
        category: ReportCategory,
        name: String,
        contact: ContactInfo,
        message: String,
        is_secret: bool,
    ) -> Result<(), OmbudsError> {
        let user_id = event.user_id;
        let record = SubmissionRecord {
            category: Some(category.to_string()),
            name: Some(name),
            contact: Some(contact.value),
            message: Some(message),
            is_secret: Some(is_secret),
            submitted_at: Some(Utc::now().to_rfc3339()),
            user_id: user_id.0,
            username: event.username.clone().or(contact.username),
        };

        if let Err(e) = self.reports.append(&record).await {
            warn!(user_id = %user_id, error = %e, "failed to persist submission");
        }

        let notify_result = self
            .channel
            .send(OutboundMessage::text(
                self.admin_chat_id,
                texts::format_admin_notification(&record),
            ))
            .await;

        // The session is gone whatever happens next.
        self.sessions.remove(user_id);

        match notify_result {
            Ok(_) => {
                info!(user_id = %user_id, category = %category, "submission completed");
                self.reply(user_id, texts::SUBMIT_SUCCESS, Keyboard::None)
                    .await
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to notify admin");
                self.reply(user_id, texts::SUBMIT_FAILURE, Keyboard::None)
                    .await
            }
        }
    }

    // --- Free text ---

    async fn handle_text(&self, event: &InboundEvent, text: &str) -> Result<(), OmbudsError> {
        // Command-marker text belongs to command handling, never to a step.
        if text.starts_with('/') {
            return Ok(());
        }

        let user_id = event.user_id;
        let Some(session) = self.sessions.get(user_id) else {
            return self.reply(user_id, texts::PLEASE_START, Keyboard::None).await;
        };

        match session.state {
            SessionState::AdminPendingPassword => self.check_password(user_id, text).await,
            SessionState::AdminSelectingUser { directory } => {
                self.select_recipient(user_id, text, directory).await
            }
            SessionState::AdminWritingMessage { recipient } => {
                self.relay_to_recipient(user_id, text, recipient).await
            }
            SessionState::EnteringName { category } => {
                self.sessions.put(
                    user_id,
                    Session::new(SessionState::EnteringContact {
                        category,
                        name: text.to_string(),
                    }),
                );
                self.reply(
                    user_id,
                    texts::ENTER_CONTACT,
                    Keyboard::RequestContact {
                        label: texts::SHARE_CONTACT_LABEL.to_string(),
                    },
                )
                .await
            }
            SessionState::EnteringContact { category, name } => {
                let contact = ContactInfo {
                    value: text.to_string(),
                    username: None,
                };
                self.advance_to_message(user_id, category, name, contact).await
            }
            SessionState::EnteringMessage {
                category,
                name,
                contact,
            } => {
                self.sessions.put(
                    user_id,
                    Session::new(SessionState::ConfirmingSecret {
                        category,
                        name,
                        contact,
                        message: text.to_string(),
                    }),
                );
                self.reply(user_id, texts::CONFIRM_SECRET, secret_keyboard())
                    .await
            }
            // Free text answers nothing in these states.
            SessionState::SelectingCategory
            | SessionState::ConfirmingSecret { .. }
            | SessionState::AdminIdle => {
                self.reply(user_id, texts::PLEASE_START, Keyboard::None).await
            }
        }
    }

    async fn check_password(&self, user_id: UserId, text: &str) -> Result<(), OmbudsError> {
        if text == self.admin_password {
            self.sessions.put(user_id, Session::new(SessionState::AdminIdle));
            info!(user_id = %user_id, "admin authenticated");
            self.reply(user_id, texts::ADMIN_MENU, Keyboard::None).await
        } else {
            // Stay in the same state, refreshed for the idle sweep.
            self.sessions
                .put(user_id, Session::new(SessionState::AdminPendingPassword));
            warn!(user_id = %user_id, "admin password rejected");
            self.reply(user_id, texts::WRONG_PASSWORD, Keyboard::None).await
        }
    }

    async fn select_recipient(
        &self,
        user_id: UserId,
        text: &str,
        directory: Vec<ombuds_core::DirectoryEntry>,
    ) -> Result<(), OmbudsError> {
        let selection = text.trim().parse::<usize>().ok();
        match selection {
            Some(n) if n >= 1 && n <= directory.len() => {
                let recipient = directory[n - 1].clone();
                let confirmation = texts::user_selected(&recipient.name);
                self.sessions.put(
                    user_id,
                    Session::new(SessionState::AdminWritingMessage { recipient }),
                );
                self.reply(user_id, confirmation, Keyboard::None).await
            }
            _ => {
                let max = directory.len();
                self.sessions.put(
                    user_id,
                    Session::new(SessionState::AdminSelectingUser { directory }),
                );
                self.reply(user_id, texts::invalid_user_number(max), Keyboard::None)
                    .await
            }
        }
    }

    async fn relay_to_recipient(
        &self,
        user_id: UserId,
        text: &str,
        recipient: ombuds_core::DirectoryEntry,
    ) -> Result<(), OmbudsError> {
        let result = self
            .channel
            .send(OutboundMessage::text(UserId(recipient.user_id), text))
            .await;

        // Back to the bare admin menu regardless of the send outcome.
        self.sessions.put(user_id, Session::new(SessionState::AdminIdle));

        match result {
            Ok(_) => {
                self.reply(
                    user_id,
                    texts::admin_send_success(&recipient.name, recipient.user_id),
                    Keyboard::None,
                )
                .await
            }
            Err(e) => {
                warn!(
                    recipient = recipient.user_id,
                    error = %e,
                    "failed to relay admin message"
                );
                self.reply(
                    user_id,
                    texts::admin_send_failure(&e.to_string()),
                    Keyboard::None,
                )
                .await
            }
        }
    }

    // --- Shared contact ---

    async fn handle_contact(&self, event: &InboundEvent, phone: &str) -> Result<(), OmbudsError> {
        let user_id = event.user_id;
        let Some(session) = self.sessions.get(user_id) else {
            return Ok(());
        };
        let SessionState::EnteringContact { category, name } = session.state else {
            return Ok(());
        };
        let contact = ContactInfo {
            value: phone.to_string(),
            username: event.username.clone(),
        };
        self.advance_to_message(user_id, category, name, contact).await
    }

    async fn advance_to_message(
        &self,
        user_id: UserId,
        category: ReportCategory,
        name: String,
        contact: ContactInfo,
    ) -> Result<(), OmbudsError> {
        self.sessions.put(
            user_id,
            Session::new(SessionState::EnteringMessage {
                category,
                name,
                contact,
            }),
        );
        self.reply(user_id, texts::ENTER_MESSAGE, Keyboard::Remove).await
    }

    // --- Helpers ---

    /// Returns the session state when `user_id` is an authenticated admin.
    fn admin_state(&self, user_id: UserId) -> Option<SessionState> {
        self.sessions
            .get(user_id)
            .map(|s| s.state)
            .filter(|state| state.is_admin())
    }

    /// Read failures degrade to "no records".
    async fn load_records(&self) -> Vec<SubmissionRecord> {
        match self.reports.load_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to load submissions, treating as empty");
                Vec::new()
            }
        }
    }

    async fn reply(
        &self,
        chat_id: UserId,
        text: impl Into<String>,
        keyboard: Keyboard,
    ) -> Result<(), OmbudsError> {
        self.channel
            .send(OutboundMessage {
                chat_id,
                text: text.into(),
                keyboard,
            })
            .await?;
        Ok(())
    }
}

/// One category per row, labels with emoji, plain values as callback tags.
fn category_keyboard() -> Keyboard {
    Keyboard::Inline(
        ReportCategory::ALL
            .iter()
            .map(|c| vec![InlineButton::new(c.button_label(), c.to_string())])
            .collect(),
    )
}

fn secret_keyboard() -> Keyboard {
    Keyboard::Inline(vec![vec![
        InlineButton::new(texts::SECRET_YES_LABEL, "secret_yes"),
        InlineButton::new(texts::SECRET_NO_LABEL, "secret_no"),
    ]])
}
