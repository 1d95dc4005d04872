// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages for assertion in tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use ombuds_core::traits::adapter::PluginAdapter;
use ombuds_core::traits::channel::ChannelAdapter;
use ombuds_core::types::{
    AdapterType, HealthStatus, InboundEvent, Keyboard, MessageId, OutboundMessage, UserId,
};
use ombuds_core::OmbudsError;

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Events injected via `inject_event()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
///
/// Sends to chats registered with `fail_sends_to()` return a channel error,
/// which exercises the delivery-failure paths.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    cleared: Arc<Mutex<Vec<(UserId, MessageId)>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            cleared: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(HashSet::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an inbound event into the receive queue.
    ///
    /// The next call to `receive()` will return this event.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Make every send to `chat_id` fail with a channel error.
    pub async fn fail_sends_to(&self, chat_id: i64) {
        self.failing_chats.lock().await.insert(chat_id);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Texts sent to one chat, in send order.
    pub async fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id.0 == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    /// The most recent text sent to one chat.
    pub async fn last_text_to(&self, chat_id: i64) -> Option<String> {
        self.texts_to(chat_id).await.last().cloned()
    }

    /// The keyboard attached to the most recent message sent to one chat.
    pub async fn last_keyboard_to(&self, chat_id: i64) -> Option<Keyboard> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id.0 == chat_id)
            .map(|m| m.keyboard.clone())
            .next_back()
    }

    /// Button-clearing calls recorded so far.
    pub async fn cleared_buttons(&self) -> Vec<(UserId, MessageId)> {
        self.cleared.lock().await.clone()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudsError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmbudsError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), OmbudsError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudsError> {
        if self.failing_chats.lock().await.contains(&msg.chat_id.0) {
            return Err(OmbudsError::Channel {
                message: format!("chat {} unreachable", msg.chat_id),
                source: None,
            });
        }
        let mut sent = self.sent.lock().await;
        sent.push(msg);
        Ok(MessageId(format!("mock-msg-{}", sent.len())))
    }

    async fn receive(&self) -> Result<InboundEvent, OmbudsError> {
        loop {
            // Try to pop from queue
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }

    async fn clear_buttons(
        &self,
        chat_id: UserId,
        message_id: &MessageId,
    ) -> Result<(), OmbudsError> {
        self.cleared
            .lock()
            .await
            .push((chat_id, message_id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombuds_core::types::EventPayload;

    fn make_event(user: i64, text: &str) -> InboundEvent {
        InboundEvent {
            user_id: UserId(user),
            username: None,
            payload: EventPayload::Text(text.to_string()),
        }
    }

    #[tokio::test]
    async fn receive_returns_injected_events() {
        let channel = MockChannel::new();
        channel.inject_event(make_event(1, "salom")).await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.user_id, UserId(1));
        assert_eq!(received.payload, EventPayload::Text("salom".into()));
    }

    #[tokio::test]
    async fn send_captures_messages_per_chat() {
        let channel = MockChannel::new();
        channel
            .send(OutboundMessage::text(UserId(1), "birinchi"))
            .await
            .unwrap();
        channel
            .send(OutboundMessage::text(UserId(2), "ikkinchi"))
            .await
            .unwrap();

        assert_eq!(channel.sent_count().await, 2);
        assert_eq!(channel.texts_to(1).await, vec!["birinchi"]);
        assert_eq!(channel.last_text_to(2).await.as_deref(), Some("ikkinchi"));
    }

    #[tokio::test]
    async fn failing_chat_returns_channel_error() {
        let channel = MockChannel::new();
        channel.fail_sends_to(42).await;

        let result = channel.send(OutboundMessage::text(UserId(42), "x")).await;
        assert!(result.is_err());
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn clear_buttons_is_recorded() {
        let channel = MockChannel::new();
        channel
            .clear_buttons(UserId(1), &MessageId("7".into()))
            .await
            .unwrap();
        let cleared = channel.cleared_buttons().await;
        assert_eq!(cleared, vec![(UserId(1), MessageId("7".into()))]);
    }
}
