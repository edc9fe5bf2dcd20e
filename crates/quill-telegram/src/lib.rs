// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Quill.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide.
//! Every text message of every chat the bot sits in is forwarded; replies are
//! sent as plain text, with results delivered as document attachments.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use quill_config::model::TelegramConfig;
use quill_core::{
    ChannelAdapter, InboundMessage, MessageId, OutboundMessage, PluginAdapter, QuillError,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, ReplyParameters};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::handler::BotIdentity;

/// Telegram's limit for message text, in characters.
const MAX_MESSAGE_CHARS: usize = 4096;
/// Telegram's limit for a document caption, in characters.
const MAX_CAPTION_CHARS: usize = 1024;

pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates the adapter. Requires `telegram.bot_token`.
    pub fn new(config: TelegramConfig) -> Result<Self, QuillError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            QuillError::Config("telegram.bot_token is required to serve".into())
        })?;
        if token.is_empty() {
            return Err(QuillError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);
        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Looks the bot up with `getMe`, falling back to the configured username.
    async fn identity(&self) -> BotIdentity {
        match self.bot.get_me().await {
            Ok(me) => BotIdentity {
                id: Some(me.id),
                username: me.user.username.clone(),
            },
            Err(e) => {
                warn!(error = %e, "getMe failed, recognising own messages by configured username");
                BotIdentity {
                    id: None,
                    username: self.config.bot_username.clone(),
                }
            }
        }
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), QuillError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let me = Arc::new(self.identity().await);
        info!(username = ?me.username, "starting Telegram long polling");

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let me = me.clone();
                async move {
                    match handler::to_inbound_message(&msg, &me) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => debug!(msg_id = msg.id.0, "ignoring forwarded message"),
                    }
                    respond(())
                }
            });

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError> {
        let chat_id = parse_chat_id(&msg.conversation_id)?;
        let reply = msg
            .reply_to
            .as_deref()
            .and_then(|id| id.parse::<i32>().ok())
            .map(|id| ReplyParameters::new(teloxide::types::MessageId(id)).allow_sending_without_reply());

        let sent = match msg.attachment {
            Some(attachment) => {
                let file = InputFile::memory(attachment.data).file_name(attachment.file_name);
                let mut request = self
                    .bot
                    .send_document(chat_id, file)
                    .caption(truncate_chars(&msg.content, MAX_CAPTION_CHARS));
                if let Some(reply) = reply {
                    request = request.reply_parameters(reply);
                }
                request.await
            }
            None => {
                let mut request = self
                    .bot
                    .send_message(chat_id, truncate_chars(&msg.content, MAX_MESSAGE_CHARS));
                if let Some(reply) = reply {
                    request = request.reply_parameters(reply);
                }
                request.await
            }
        }
        .map_err(|e| QuillError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, QuillError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| QuillError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

fn parse_chat_id(conversation_id: &str) -> Result<ChatId, QuillError> {
    conversation_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| QuillError::Channel {
            message: format!("invalid chat id {conversation_id:?}: {e}"),
            source: None,
        })
}

/// The first `max` characters of `text`, with an ellipsis when cut.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(String::from),
            bot_username: None,
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(config(None)).is_err());
        assert!(TelegramChannel::new(config(Some(""))).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let channel =
            TelegramChannel::new(config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"))).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert!(channel.polling_handle.is_none());
    }

    #[test]
    fn chat_ids_parse_from_conversation_id() {
        assert_eq!(parse_chat_id("-100123").unwrap(), ChatId(-100123));
        assert!(parse_chat_id("group").is_err());
    }

    #[test]
    fn long_text_is_truncated_to_limit() {
        assert_eq!(truncate_chars("short", 10), "short");
        let cut = truncate_chars(&"é".repeat(5000), MAX_MESSAGE_CHARS);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_CHARS);
        assert!(cut.ends_with('…'));
    }
}
