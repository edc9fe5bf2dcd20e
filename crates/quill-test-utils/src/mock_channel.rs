// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory channel adapter.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use quill_core::{
    ChannelAdapter, InboundMessage, MessageId, OutboundMessage, PluginAdapter, QuillError,
};
use tokio::sync::{Mutex, Notify};

/// A channel whose inbound queue is fed by the test and whose outbound
/// messages are recorded.
///
/// Clones share the same queues, so a test can keep one handle while the
/// code under test owns another.
#[derive(Clone, Default)]
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    arrived: Arc<Notify>,
    delivered: Arc<Notify>,
    next_id: Arc<AtomicU64>,
    shutdowns: Arc<AtomicU64>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message for the next `receive()`.
    pub async fn inject(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.arrived.notify_one();
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Number of `shutdown()` calls so far.
    pub fn shutdown_count(&self) -> u64 {
        self.shutdowns.load(Ordering::Relaxed)
    }

    /// Waits until at least `n` messages were sent, returning them.
    pub async fn wait_for_sent(&self, n: usize) -> Vec<OutboundMessage> {
        loop {
            let notified = self.delivered.notified();
            {
                let sent = self.sent.lock().await;
                if sent.len() >= n {
                    return sent.clone();
                }
            }
            notified.await;
        }
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        self.shutdowns.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), QuillError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, QuillError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sent.lock().await.push(msg);
        self.delivered.notify_waiters();
        Ok(MessageId(format!("mock-{id}")))
    }

    async fn receive(&self) -> Result<InboundMessage, QuillError> {
        loop {
            if let Some(msg) = self.inbound.lock().await.pop_front() {
                return Ok(msg);
            }
            self.arrived.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::inbound;

    #[tokio::test]
    async fn injected_messages_are_received_in_order() {
        let channel = MockChannel::new();
        channel.inject(inbound("one")).await;
        channel.inject(inbound("two")).await;
        assert_eq!(channel.receive().await.unwrap().text.as_deref(), Some("one"));
        assert_eq!(channel.receive().await.unwrap().text.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = MockChannel::new();
        let handle = channel.clone();
        let task = tokio::spawn(async move { handle.receive().await.unwrap().text });
        tokio::task::yield_now().await;
        channel.inject(inbound("late")).await;
        assert_eq!(task.await.unwrap().as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn sends_are_captured_across_clones() {
        let channel = MockChannel::new();
        let msg = inbound("q");
        let id = channel
            .clone()
            .send(OutboundMessage::reply(&msg, "answer"))
            .await
            .unwrap();
        assert_eq!(id, MessageId("mock-1".into()));
        let sent = channel.wait_for_sent(1).await;
        assert_eq!(sent[0].content, "answer");
        assert_eq!(sent[0].reply_to.as_deref(), Some(msg.id.as_str()));
    }
}
