// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::OmbudsError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, MessageId, OutboundMessage, UserId};

/// Adapter for bidirectional messaging channel integrations.
///
/// Channel adapters connect Ombuds to an external messaging platform,
/// handling event ingestion and message delivery.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), OmbudsError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudsError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, OmbudsError>;

    /// Removes the inline keyboard from a previously sent message.
    ///
    /// Implementations treat an already-cleared keyboard as success so the
    /// conversation can continue after duplicate button presses.
    async fn clear_buttons(&self, chat_id: UserId, message_id: &MessageId)
    -> Result<(), OmbudsError>;
}
