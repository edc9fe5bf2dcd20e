// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the log store, query engine, router and adapters.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

/// Author name used when a record carries neither a username nor a first name.
pub const FALLBACK_AUTHOR: &str = "User";

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// The unit of log storage: one conversation on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    /// Resolved conversation name (chat title, username, or id).
    pub conversation: String,
    /// UTC calendar day.
    pub day: NaiveDate,
}

impl PartitionKey {
    pub fn new(conversation: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            conversation: conversation.into(),
            day,
        }
    }

    /// Partition holding a message received at `timestamp`.
    pub fn for_timestamp(conversation: impl Into<String>, timestamp: &DateTime<Utc>) -> Self {
        Self::new(conversation, timestamp.date_naive())
    }

    /// Durable file name: `<conversation>-<YYYY-MM-DD>.json`.
    ///
    /// Path separators and control characters in the conversation name are
    /// replaced with `_` so a chat title can never escape the log directory.
    pub fn file_name(&self) -> String {
        let mut name: String = self
            .conversation
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        if name.starts_with('.') {
            name.replace_range(..1, "_");
        }
        format!("{name}-{}.json", self.day.format("%Y-%m-%d"))
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.conversation, self.day)
    }
}

/// One logged message.
///
/// The serialized field names match the durable log format, so existing log
/// files round-trip unchanged. Every field is optional on read; a record
/// written by an older version with missing fields still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub message_id: i64,
    /// ISO-8601 timestamp derived from the source message date.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_last_name: Option<String>,
}

impl Record {
    /// Best-effort display name: username, else first name, else `User`.
    pub fn author(&self) -> &str {
        non_empty(&self.sender_username)
            .or_else(|| non_empty(&self.sender_first_name))
            .unwrap_or(FALLBACK_AUTHOR)
    }

    /// Message body, empty when the message had no text.
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Parsed timestamp, if the stored date is valid RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Sender details of an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub id: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The message an inbound message replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyContext {
    pub message_id: String,
    /// Whether the replied-to message was sent by this assistant.
    pub from_self: bool,
    pub text: Option<String>,
}

/// A message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel-native message id.
    pub id: String,
    /// Channel-native conversation id used to route replies.
    pub conversation_id: String,
    /// Human-readable conversation name used for log partitioning.
    pub conversation_name: String,
    pub sender: Sender,
    /// Text or caption. `None` for stickers, uncaptioned media and similar.
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub reply_to: Option<ReplyContext>,
}

impl InboundMessage {
    /// Log partition this message belongs to.
    pub fn partition(&self) -> PartitionKey {
        PartitionKey::for_timestamp(&self.conversation_name, &self.timestamp)
    }

    /// Message text, empty when the message had none.
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Converts the message into a log record.
    ///
    /// The durable format stores a numeric message id; a non-numeric channel
    /// id is stored as `0`.
    pub fn to_record(&self) -> Record {
        let message_id = match self.id.parse() {
            Ok(id) => id,
            Err(_) => {
                debug!(id = %self.id, "non-numeric message id, storing 0");
                0
            }
        };
        Record {
            message_id,
            date: self
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            text: self.text.clone(),
            sender_id: self.sender.id.clone(),
            sender_username: self.sender.username.clone(),
            sender_first_name: self.sender.first_name.clone(),
            sender_last_name: self.sender.last_name.clone(),
        }
    }
}

/// A file sent along with an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A message to be delivered through a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub conversation_id: String,
    /// Message id this is a reply to, if any.
    pub reply_to: Option<String>,
    pub content: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    /// Builds a reply to `msg` in the same conversation.
    pub fn reply(msg: &InboundMessage, content: impl Into<String>) -> Self {
        Self {
            conversation_id: msg.conversation_id.clone(),
            reply_to: Some(msg.id.clone()),
            content: content.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// A command the assistant answers, independent of the prefix that selects it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    /// Question to the prompt endpoint.
    Ask,
    /// Question to the prompt endpoint with the chat persona and context.
    Chat,
    /// Fetch a web page as markdown.
    Fetch,
    Arf,
    /// Summarize a day of the conversation log.
    Summarize,
    /// Substring search over today's log.
    Search,
    /// Usage statistics for today's log.
    Stats,
    /// Fuzzy subsequence search over today's log.
    FuzzySearch,
    /// Streaming search through the external index producer.
    ExternalSearch,
}

/// Which prompt-endpoint profile a question is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PromptKind {
    /// Plain question, no extra context.
    Ask,
    /// Conversational persona with the configured context document attached.
    Chat,
}
