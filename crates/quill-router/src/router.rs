// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command router and its reply plumbing.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quill_config::model::QuillConfig;
use quill_core::{
    ChannelAdapter, CommandKind, ContentAdapter, InboundMessage, OutboundMessage, PromptAdapter,
    QuillError, SummaryAdapter,
};
use quill_logstore::LogStore;
use quill_query::QueryEngine;
use quill_search::StreamAggregator;
use tracing::{debug, error, info, warn};

use crate::prefix::{ParsedCommand, PrefixTable};

/// Reply sent when a handler fails for a reason other than bad input.
pub(crate) const FAILURE_REPLY: &str = "Sorry, something went wrong handling that command.";

const BARK_INTERVAL: Duration = Duration::from_secs(1);

/// Logs inbound messages and answers the commands among them.
pub struct CommandRouter {
    pub(crate) channel: Arc<dyn ChannelAdapter>,
    pub(crate) store: Arc<LogStore>,
    pub(crate) engine: QueryEngine,
    pub(crate) prefixes: PrefixTable,
    pub(crate) summary_window: usize,
    pub(crate) aggregator: StreamAggregator,
    pub(crate) results_file: PathBuf,
    pub(crate) denied_senders: HashSet<String>,
    pub(crate) summarizer: Option<Arc<dyn SummaryAdapter>>,
    pub(crate) prompt: Option<Arc<dyn PromptAdapter>>,
    pub(crate) content: Option<Arc<dyn ContentAdapter>>,
    pub(crate) context_path: Option<PathBuf>,
    pub(crate) bark_interval: Duration,
}

impl CommandRouter {
    /// Builds a router with no language-model adapters attached.
    pub fn new(
        config: &QuillConfig,
        store: Arc<LogStore>,
        channel: Arc<dyn ChannelAdapter>,
    ) -> Self {
        Self {
            channel,
            engine: QueryEngine::new(store.clone(), config.query.result_limit),
            store,
            prefixes: PrefixTable::from_config(&config.commands),
            summary_window: config.query.summary_window,
            aggregator: StreamAggregator::from_config(&config.search),
            results_file: PathBuf::from(&config.search.results_file),
            denied_senders: config.search.denied_senders.iter().cloned().collect(),
            summarizer: None,
            prompt: None,
            content: None,
            context_path: config.prompt.context_path.as_ref().map(PathBuf::from),
            bark_interval: BARK_INTERVAL,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn SummaryAdapter>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn PromptAdapter>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_content(mut self, content: Arc<dyn ContentAdapter>) -> Self {
        self.content = Some(content);
        self
    }

    /// Overrides the pause between barks.
    pub fn with_bark_interval(mut self, interval: Duration) -> Self {
        self.bark_interval = interval;
        self
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Logs `msg` and answers it if it carries a command.
    pub async fn handle(&self, msg: InboundMessage) {
        self.store.append(msg.partition(), msg.to_record());

        let Some(command) = self.prefixes.resolve(&msg) else {
            return;
        };
        info!(
            command = %command.kind,
            chained = command.chained,
            conversation = %msg.conversation_name,
            "dispatching command"
        );

        match self.dispatch(&msg, &command).await {
            Ok(()) => {}
            Err(QuillError::Usage(text)) => {
                debug!(command = %command.kind, "usage reply");
                self.reply(&msg, text).await;
            }
            Err(e) => {
                error!(command = %command.kind, error = %e, "command failed");
                let text = match (command.kind, &e) {
                    (CommandKind::ExternalSearch, QuillError::Producer { message, .. }) => {
                        format!("Error running search: {message}")
                    }
                    _ => FAILURE_REPLY.to_string(),
                };
                self.reply(&msg, text).await;
            }
        }
    }

    /// Runs the handler for `command`.
    pub async fn dispatch(
        &self,
        msg: &InboundMessage,
        command: &ParsedCommand,
    ) -> Result<(), QuillError> {
        let arg = command.argument.as_str();
        match command.kind {
            CommandKind::Search => self.search(msg, arg).await,
            CommandKind::FuzzySearch => self.fuzzy_search(msg, arg).await,
            CommandKind::Stats => self.stats(msg).await,
            CommandKind::Summarize => self.summarize(msg, arg).await,
            CommandKind::ExternalSearch => self.external_search(msg, arg).await,
            CommandKind::Ask | CommandKind::Chat => self.ask(msg, command.kind, arg).await,
            CommandKind::Fetch => self.fetch(msg, arg).await,
            CommandKind::Arf => self.arf(msg).await,
        }
    }

    /// The configured prefix for `kind`, or the command name.
    pub(crate) fn prefix_or_name(&self, kind: CommandKind) -> String {
        self.prefixes
            .prefix_for(kind)
            .map(str::to_string)
            .unwrap_or_else(|| kind.to_string())
    }

    /// Sends a plain text reply. Delivery failures are logged only.
    pub(crate) async fn reply(&self, msg: &InboundMessage, text: impl Into<String>) {
        self.deliver(OutboundMessage::reply(msg, text)).await;
    }

    pub(crate) async fn deliver(&self, out: OutboundMessage) {
        if let Err(e) = self.channel.send(out).await {
            warn!(error = %e, "failed to deliver reply");
        }
    }
}
