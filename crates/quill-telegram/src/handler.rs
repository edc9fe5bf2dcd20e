// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram messages into channel-agnostic [`InboundMessage`]s.

use quill_core::{InboundMessage, ReplyContext, Sender};
use teloxide::types::{Chat, Message, UserId};

/// Who this bot is, used to recognise replies to its own messages.
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub id: Option<UserId>,
    pub username: Option<String>,
}

impl BotIdentity {
    fn is_self(&self, msg: &Message) -> bool {
        let Some(user) = msg.from.as_ref() else {
            return false;
        };
        if let Some(id) = self.id {
            return user.id == id;
        }
        match (&self.username, &user.username) {
            (Some(ours), Some(theirs)) => {
                ours.trim_start_matches('@').eq_ignore_ascii_case(theirs)
            }
            _ => false,
        }
    }
}

/// Name used for log partitioning: chat title, else username, else first
/// name, else the numeric chat id.
pub fn conversation_name(chat: &Chat) -> String {
    chat.title()
        .or_else(|| chat.username())
        .or_else(|| chat.first_name())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| chat.id.0.to_string())
}

/// Converts a Telegram message. Forwards yield `None`; messages without
/// text or a caption convert with no text so they are still logged.
pub fn to_inbound_message(msg: &Message, me: &BotIdentity) -> Option<InboundMessage> {
    if msg.forward_origin().is_some() {
        return None;
    }
    let text = msg.text().or_else(|| msg.caption()).map(str::to_string);

    let sender = msg
        .from
        .as_ref()
        .map(|user| Sender {
            id: Some(user.id.0.to_string()),
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        })
        .unwrap_or_default();

    let reply_to = msg.reply_to_message().map(|replied| ReplyContext {
        message_id: replied.id.0.to_string(),
        from_self: me.is_self(replied),
        text: replied
            .text()
            .or_else(|| replied.caption())
            .map(str::to_string),
    });

    Some(InboundMessage {
        id: msg.id.0.to_string(),
        conversation_id: msg.chat.id.0.to_string(),
        conversation_name: conversation_name(&msg.chat),
        sender,
        text,
        timestamp: msg.date,
        reply_to,
    })
}
