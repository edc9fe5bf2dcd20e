// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The external index search command.

use quill_core::{CommandKind, InboundMessage, OutboundMessage, QuillError};
use quill_search::write_results;
use tracing::{info, warn};

use crate::router::CommandRouter;

const REFUSAL: &str = "Nah.";

impl CommandRouter {
    pub(crate) async fn external_search(
        &self,
        msg: &InboundMessage,
        term: &str,
    ) -> Result<(), QuillError> {
        let denied = msg
            .sender
            .id
            .as_ref()
            .is_some_and(|id| self.denied_senders.contains(id));
        if denied {
            info!(sender = ?msg.sender.id, "external search refused");
            self.reply(msg, REFUSAL).await;
            return Ok(());
        }

        if term.is_empty() {
            return Err(QuillError::Usage(format!(
                "Usage: {} <search-term>",
                self.prefix_or_name(CommandKind::ExternalSearch)
            )));
        }

        let outcome = self.aggregator.run(term).await?;
        if outcome.is_empty() {
            let mut text = format!("No results for \"{term}\".");
            if outcome.timed_out {
                text.push_str(" The search timed out.");
            }
            self.reply(msg, text).await;
            return Ok(());
        }

        let attachment = write_results(&self.results_file, &outcome).await?;
        let mut caption = format!(
            "{} Search results for \"{term}\" (showing up to {} unique lines).",
            outcome.lines.len(),
            self.aggregator.quota()
        );
        if outcome.timed_out {
            warn!(term, "external search timed out, sending partial results");
            caption.push_str(" The search timed out; results are partial.");
        }
        self.deliver(OutboundMessage::reply(msg, caption).with_attachment(attachment))
            .await;
        Ok(())
    }
}
