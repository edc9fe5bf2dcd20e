// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill serve`: wires the Telegram channel, log store, LLM clients and
//! router into the assistant loop.

use std::sync::Arc;
use std::time::Duration;

use quill_agent::{AssistantLoop, shutdown};
use quill_config::QuillConfig;
use quill_core::{ChannelAdapter, QuillError};
use quill_llm::{ChatCompletionClient, ContentClient, PromptClient};
use quill_logstore::LogStore;
use quill_router::CommandRouter;
use quill_telegram::TelegramChannel;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run_serve(config: QuillConfig) -> Result<(), QuillError> {
    info!(name = %config.agent.name, "starting quill serve");

    let store = Arc::new(LogStore::from_config(&config.logs));
    info!(directory = %store.directory().display(), "log store ready");

    let mut telegram = TelegramChannel::new(config.telegram.clone())?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let mut router = CommandRouter::new(&config, store.clone(), channel.clone())
        .with_summarizer(Arc::new(ChatCompletionClient::new(config.summary.clone())?));
    match PromptClient::from_config(&config.prompt)? {
        Some(client) => router = router.with_prompt(Arc::new(client)),
        None => info!("prompt.base_url not set, ask and chat disabled"),
    }
    match ContentClient::from_config(&config.content)? {
        Some(client) => router = router.with_content(Arc::new(client)),
        None => info!("content.endpoint not set, fetch disabled"),
    }

    let cancel = shutdown::install_signal_handler();
    {
        let monitor_cancel = cancel.clone();
        tokio::spawn(async move { memory_monitor(monitor_cancel).await });
    }

    let assistant = AssistantLoop::new(
        channel,
        Arc::new(router),
        store,
        Duration::from_secs(config.logs.flush_interval_secs),
    );
    assistant.run(cancel).await?;

    info!("quill serve shutdown complete");
    Ok(())
}

/// Logs allocator statistics once a minute.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let _ = tikv_jemalloc_ctl::epoch::advance();
                let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
                let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
                tracing::debug!(
                    allocated_mb = allocated / (1024 * 1024),
                    resident_mb = resident / (1024 * 1024),
                    "memory usage"
                );
            }
            _ = cancel.cancelled() => break,
        }
    }
}

#[cfg(target_env = "msvc")]
async fn memory_monitor(cancel: CancellationToken) {
    cancel.cancelled().await;
}
