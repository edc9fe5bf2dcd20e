// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use quill_core::{InboundMessage, ReplyContext, Sender};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A message from `alice` (sender id `100`) in conversation `test-chat`.
pub fn inbound(text: &str) -> InboundMessage {
    InboundMessage {
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string(),
        conversation_id: "-1001".to_string(),
        conversation_name: "test-chat".to_string(),
        sender: Sender {
            id: Some("100".to_string()),
            username: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: None,
        },
        text: Some(text.to_string()),
        timestamp: Utc::now(),
        reply_to: None,
    }
}

/// Helpers for tweaking a fixture message.
pub trait InboundExt {
    fn from_sender(self, id: &str, username: Option<&str>) -> Self;
    fn replying_to_self(self, text: &str) -> Self;
    /// Drops the text, as for a sticker or an uncaptioned photo.
    fn without_text(self) -> Self;
}

impl InboundExt for InboundMessage {
    fn from_sender(mut self, id: &str, username: Option<&str>) -> Self {
        self.sender.id = Some(id.to_string());
        self.sender.username = username.map(String::from);
        self
    }

    fn replying_to_self(mut self, text: &str) -> Self {
        self.reply_to = Some(ReplyContext {
            message_id: "0".to_string(),
            from_self: true,
            text: Some(text.to_string()),
        });
        self
    }

    fn without_text(mut self) -> Self {
        self.text = None;
        self
    }
}
