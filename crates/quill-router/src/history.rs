// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers that query the conversation log.

use chrono::{Days, Local};
use quill_core::{InboundMessage, PartitionKey, QuillError};
use quill_query::format_result_line;
use tracing::debug;

use crate::router::CommandRouter;

impl CommandRouter {
    pub(crate) async fn search(&self, msg: &InboundMessage, query: &str) -> Result<(), QuillError> {
        let matches = self.engine.substring_search(&msg.partition(), query).await?;
        let text = if matches.is_empty() {
            format!("No matches found for \"{query}\".")
        } else {
            let lines: Vec<String> = matches.iter().map(format_result_line).collect();
            format!("Search results for \"{query}\":\n{}", lines.join("\n"))
        };
        self.reply(msg, text).await;
        Ok(())
    }

    pub(crate) async fn fuzzy_search(
        &self,
        msg: &InboundMessage,
        query: &str,
    ) -> Result<(), QuillError> {
        let matches = self.engine.fuzzy_search(&msg.partition(), query).await?;
        let text = if matches.is_empty() {
            format!("No fuzzy matches found for \"{query}\".")
        } else {
            let lines: Vec<String> = matches
                .iter()
                .map(|m| format_result_line(&m.record))
                .collect();
            format!("Fuzzy search results for \"{query}\":\n{}", lines.join("\n"))
        };
        self.reply(msg, text).await;
        Ok(())
    }

    pub(crate) async fn stats(&self, msg: &InboundMessage) -> Result<(), QuillError> {
        let stats = self.engine.statistics(&msg.partition(), &Local).await?;
        self.reply(msg, stats.to_string()).await;
        Ok(())
    }

    /// `summarize [-d N]`: summary of the day `N` days before the message.
    pub(crate) async fn summarize(&self, msg: &InboundMessage, arg: &str) -> Result<(), QuillError> {
        let Some(summarizer) = &self.summarizer else {
            return Err(QuillError::Usage("Summaries are not configured.".to_string()));
        };

        let days_ago = days_ago(arg);
        let day = msg
            .timestamp
            .date_naive()
            .checked_sub_days(Days::new(days_ago))
            .ok_or_else(|| QuillError::Usage(format!("Cannot go back {days_ago} days.")))?;
        let partition = PartitionKey::new(msg.conversation_name.clone(), day);

        let transcript = self
            .engine
            .recent_transcript(&partition, self.summary_window)
            .await?;
        if transcript.is_empty() {
            self.reply(msg, format!("No messages logged for {day}.")).await;
            return Ok(());
        }
        debug!(partition = %partition, chars = transcript.len(), "summarizing transcript");

        let summary = summarizer.summarize(&transcript).await?;
        self.reply(msg, format!("Summary ({days_ago} day(s) ago):\n{summary}"))
            .await;
        Ok(())
    }
}

/// Value following `-d`; zero when absent or not a number.
fn days_ago(arg: &str) -> u64 {
    let mut tokens = arg.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "-d" {
            return tokens.next().and_then(|n| n.parse().ok()).unwrap_or(0);
        }
    }
    0
}
