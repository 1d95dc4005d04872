// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing and content extraction.
//!
//! Determines whether an incoming Telegram update should be processed,
//! then maps it into a channel-agnostic [`InboundEvent`].

use teloxide::prelude::*;
use teloxide::types::ChatKind;

use ombuds_core::{EventPayload, InboundEvent, UserId};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Parses a command out of message text.
///
/// Returns the lowercased command name without the leading slash or a
/// trailing `@botname` mention. Non-command text returns `None`.
pub fn parse_command(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let name = rest
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Maps a Telegram message to an [`InboundEvent`].
///
/// Handles text, commands, and shared contacts. Returns `None` for
/// unsupported message types (stickers, photos, locations, etc.).
pub fn to_inbound_event(msg: &Message) -> Option<InboundEvent> {
    let user_id = UserId(msg.chat.id.0);
    let username = msg.from.as_ref().and_then(|u| u.username.clone());

    if let Some(contact) = msg.contact() {
        return Some(InboundEvent {
            user_id,
            username,
            payload: EventPayload::ContactShared {
                phone: contact.phone_number.clone(),
            },
        });
    }

    let text = msg.text()?;
    let payload = match parse_command(text) {
        Some(command) => EventPayload::Command(command),
        None => EventPayload::Text(text.to_string()),
    };

    Some(InboundEvent {
        user_id,
        username,
        payload,
    })
}

/// Maps a callback query (inline button press) to an [`InboundEvent`].
///
/// Queries without callback data return `None`.
pub fn to_button_event(q: &CallbackQuery) -> Option<InboundEvent> {
    let tag = q.data.clone()?;
    let message_id = q
        .message
        .as_ref()
        .map(|m| ombuds_core::MessageId(m.id().0.to_string()));

    Some(InboundEvent {
        user_id: UserId(q.from.id.0 as i64),
        username: q.from.username.clone(),
        payload: EventPayload::ButtonPressed { tag, message_id },
    })
}
