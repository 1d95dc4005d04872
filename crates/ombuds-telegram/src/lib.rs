// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Ombuds bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, inline and reply keyboards, and callback query
//! routing.

pub mod handler;

use async_trait::async_trait;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup, KeyboardRemove, Recipient, ReplyMarkup,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ombuds_config::model::TelegramConfig;
use ombuds_core::error::OmbudsError;
use ombuds_core::traits::{ChannelAdapter, PluginAdapter};
use ombuds_core::types::{
    AdapterType, HealthStatus, InboundEvent, Keyboard, MessageId, OutboundMessage, UserId,
};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, accepts private-chat messages and
/// button presses, and delivers replies with the keyboard each step asks for.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, OmbudsError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            OmbudsError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(OmbudsError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudsError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), OmbudsError> {
        debug!("Telegram channel shutting down");
        // The polling handle will be dropped when TelegramChannel is dropped,
        // which aborts the task. For graceful shutdown, the intake loop should
        // stop calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), OmbudsError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let msg_tx = tx.clone();
            let message_branch = Update::filter_message().endpoint(move |msg: Message| {
                let tx = msg_tx.clone();
                async move {
                    // Filter: DMs only
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    match handler::to_inbound_event(&msg) {
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                        }
                    }

                    respond(())
                }
            });

            let cb_tx = tx.clone();
            let callback_branch =
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let tx = cb_tx.clone();
                    async move {
                        // Stop the client-side spinner.
                        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                            debug!(error = %e, "failed to answer callback query");
                        }

                        if let Some(event) = handler::to_button_event(&q)
                            && tx.send(event).await.is_err()
                        {
                            warn!("inbound channel closed, dropping button press");
                        }

                        respond(())
                    }
                });

            let tree = dptree::entry()
                .branch(message_branch)
                .branch(callback_branch);

            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OmbudsError> {
        let chat_id = ChatId(msg.chat_id.0);
        let request = self.bot.send_message(Recipient::Id(chat_id), &msg.text);
        let request = match keyboard_markup(&msg.keyboard) {
            Some(markup) => request.reply_markup(markup),
            None => request,
        };

        let sent = request.await.map_err(|e| OmbudsError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundEvent, OmbudsError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| OmbudsError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn clear_buttons(
        &self,
        chat_id: UserId,
        message_id: &MessageId,
    ) -> Result<(), OmbudsError> {
        let msg_id = message_id
            .0
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|e| OmbudsError::Channel {
                message: format!("invalid message_id: {e}"),
                source: None,
            })?;

        let result = self
            .bot
            .edit_message_reply_markup(ChatId(chat_id.0), msg_id)
            .reply_markup(InlineKeyboardMarkup::new(
                Vec::<Vec<InlineKeyboardButton>>::new(),
            ))
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let err_str = e.to_string();
                // An already-cleared keyboard counts as cleared.
                if err_str.contains("message is not modified") {
                    Ok(())
                } else {
                    Err(OmbudsError::Channel {
                        message: format!("failed to clear buttons: {e}"),
                        source: Some(Box::new(e)),
                    })
                }
            }
        }
    }
}

/// Maps the channel-agnostic keyboard to a Telegram reply markup.
fn keyboard_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::Inline(rows) => {
            let rows = rows.iter().map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.tag.clone()))
                    .collect::<Vec<_>>()
            });
            Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
        }
        Keyboard::RequestContact { label } => {
            let button = KeyboardButton::new(label.clone()).request(ButtonRequest::Contact);
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(vec![vec![button]])
                    .resize_keyboard()
                    .one_time_keyboard(),
            ))
        }
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}
