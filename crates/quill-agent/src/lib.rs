// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Quill message loop.
//!
//! Receives inbound messages from a channel, hands each one to the
//! [`CommandRouter`] in its own task, runs the periodic log flush, and on
//! shutdown waits for in-flight handlers before the final flush.

pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use quill_core::{ChannelAdapter, QuillError};
use quill_logstore::{LogStore, spawn_flush_task};
use quill_router::CommandRouter;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How long shutdown waits for in-flight handlers.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AssistantLoop {
    channel: Arc<dyn ChannelAdapter>,
    router: Arc<CommandRouter>,
    store: Arc<LogStore>,
    flush_interval: Duration,
    drain_timeout: Duration,
}

impl AssistantLoop {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        router: Arc<CommandRouter>,
        store: Arc<LogStore>,
        flush_interval: Duration,
    ) -> Self {
        Self {
            channel,
            router,
            store,
            flush_interval,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Runs until `cancel` fires or the channel closes.
    ///
    /// Returns once the final flush has completed.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), QuillError> {
        info!(flush_interval = ?self.flush_interval, "assistant loop running");

        let flush_cancel = CancellationToken::new();
        let flush_task =
            spawn_flush_task(self.store.clone(), self.flush_interval, flush_cancel.clone());
        let mut handlers = JoinSet::new();

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            debug!(id = %inbound.id, conversation = %inbound.conversation_name, "inbound message");
                            let router = self.router.clone();
                            handlers.spawn(async move { router.handle(inbound).await });
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error, stopping");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping assistant loop");
                    break;
                }
            }
            while let Some(done) = handlers.try_join_next() {
                if let Err(e) = done {
                    error!(error = %e, "message handler panicked");
                }
            }
        }

        drain_handlers(&mut handlers, self.drain_timeout).await;

        flush_cancel.cancel();
        if let Err(e) = flush_task.await {
            error!(error = %e, "flush task failed");
        }
        if let Err(e) = self.channel.shutdown().await {
            warn!(error = %e, "channel shutdown failed");
        }

        info!(pending = self.store.pending_count(), "assistant loop stopped");
        Ok(())
    }
}

/// Waits up to `timeout` for running handlers, aborting the rest.
async fn drain_handlers(handlers: &mut JoinSet<()>, timeout: Duration) {
    if handlers.is_empty() {
        return;
    }
    info!(count = handlers.len(), "waiting for in-flight handlers");
    let drained = tokio::time::timeout(timeout, async {
        while handlers.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!(remaining = handlers.len(), "drain timeout reached, aborting handlers");
        handlers.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::model::QuillConfig;
    use quill_test_utils::{MockChannel, inbound};

    fn setup(dir: &std::path::Path) -> (MockChannel, Arc<LogStore>, AssistantLoop) {
        let mut config = QuillConfig::default();
        config.logs.directory = dir.display().to_string();
        let channel = MockChannel::new();
        let store = Arc::new(LogStore::from_config(&config.logs));
        let router = CommandRouter::new(&config, store.clone(), Arc::new(channel.clone()));
        let assistant = AssistantLoop::new(
            Arc::new(channel.clone()),
            Arc::new(router),
            store.clone(),
            Duration::from_secs(3600),
        );
        (channel, store, assistant)
    }

    #[tokio::test]
    async fn cancel_flushes_logged_messages() {
        let dir = tempfile::tempdir().unwrap();
        let (channel, store, assistant) = setup(dir.path());
        let cancel = CancellationToken::new();

        let msg = inbound("remember me");
        let partition = msg.partition();
        channel.inject(msg).await;
        channel.inject(inbound("!stats")).await;

        let run_cancel = cancel.clone();
        let task = tokio::spawn(async move { assistant.run(run_cancel).await });
        channel.wait_for_sent(1).await;
        cancel.cancel();
        task.await.unwrap().unwrap();

        assert_eq!(store.pending_count(), 0);
        assert!(store.partition_path(&partition).exists());
        assert_eq!(store.read_all(&partition).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stopping_shuts_down_channel_once() {
        let dir = tempfile::tempdir().unwrap();
        let (channel, _store, assistant) = setup(dir.path());
        let cancel = CancellationToken::new();
        cancel.cancel();

        assistant.run(cancel).await.unwrap();
        assert_eq!(channel.shutdown_count(), 1);
    }

    #[tokio::test]
    async fn drain_with_no_handlers_returns_immediately() {
        let mut handlers = JoinSet::new();
        drain_handlers(&mut handlers, Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn drain_aborts_stuck_handlers() {
        let mut handlers = JoinSet::new();
        handlers.spawn(async { tokio::time::sleep(Duration::from_secs(3600)).await });
        let started = std::time::Instant::now();
        drain_handlers(&mut handlers, Duration::from_millis(20)).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
