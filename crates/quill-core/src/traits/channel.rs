// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Adapter for bidirectional messaging channel integrations.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), QuillError>;

    /// Sends a message, with its attachment if any, through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, QuillError>;
}
