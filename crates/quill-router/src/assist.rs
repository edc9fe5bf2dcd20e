// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers backed by the prompt and content endpoints, plus `arf`.

use quill_core::{Attachment, CommandKind, InboundMessage, OutboundMessage, PromptKind, QuillError};
use tracing::{debug, warn};

use crate::router::CommandRouter;

/// Longest page excerpt sent inline, in characters.
const INLINE_LIMIT: usize = 2000;

impl CommandRouter {
    /// `ask`/`chat`: the answer is prefixed with the command's own prefix so
    /// a reply to it chains back into the same command.
    pub(crate) async fn ask(
        &self,
        msg: &InboundMessage,
        kind: CommandKind,
        question: &str,
    ) -> Result<(), QuillError> {
        let Some(prompt) = &self.prompt else {
            return Err(QuillError::Usage("Questions are not configured.".to_string()));
        };
        let prefix = self.prefix_or_name(kind);
        if question.is_empty() {
            return Err(QuillError::Usage(format!("Usage: {prefix} <question>")));
        }

        let (profile, context) = match kind {
            CommandKind::Chat => (PromptKind::Chat, self.chat_context().await),
            _ => (PromptKind::Ask, String::new()),
        };
        let answer = prompt.ask(profile, question, &context).await?;
        self.reply(msg, format!("{prefix} {answer}")).await;
        Ok(())
    }

    async fn chat_context(&self) -> String {
        let Some(path) = &self.context_path else {
            return String::new();
        };
        match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chat context unreadable, sending none");
                String::new()
            }
        }
    }

    /// `fetch [+inline] <url>`: page as a markdown document, or an inline
    /// excerpt with `+inline`.
    pub(crate) async fn fetch(&self, msg: &InboundMessage, arg: &str) -> Result<(), QuillError> {
        let Some(content) = &self.content else {
            return Err(QuillError::Usage("Page fetching is not configured.".to_string()));
        };

        let mut parts = arg.split_whitespace();
        let (flags, url) = match (parts.next(), parts.next()) {
            (Some(flags), Some(url)) => (flags.to_lowercase(), url),
            (Some(url), None) => (String::new(), url),
            _ => {
                return Err(QuillError::Usage(format!(
                    "Usage: {} [+inline] <url>",
                    self.prefix_or_name(CommandKind::Fetch)
                )));
            }
        };
        let inline = flags.contains("+inline");
        if flags.contains("+pdf") {
            debug!("pdf output requested, sending markdown");
        }

        let markdown = content.fetch_markdown(url).await?;
        let out = if inline {
            let excerpt: String = markdown.chars().take(INLINE_LIMIT).collect();
            OutboundMessage::reply(msg, format!("Content for {url}:\n\n{excerpt}"))
        } else {
            OutboundMessage::reply(msg, format!("Markdown for ->> {url}")).with_attachment(
                Attachment {
                    file_name: format!("{}.md", slugify(url)),
                    data: markdown.into_bytes(),
                },
            )
        };
        self.deliver(out).await;
        Ok(())
    }

    pub(crate) async fn arf(&self, msg: &InboundMessage) -> Result<(), QuillError> {
        for bark in 0..3 {
            if bark > 0 {
                tokio::time::sleep(self.bark_interval).await;
            }
            self.reply(msg, "ARF!").await;
        }
        Ok(())
    }
}

/// File-name-safe form of a URL: lowercase alphanumerics joined by `-`.
fn slugify(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut slug = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug.chars().take(80).collect::<String>().trim_end_matches('-').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slug_from_url() {
        assert_eq!(slugify("https://example.com/a/B_c?d=1"), "example-com-a-b-c-d-1");
        assert_eq!(slugify("http://x.org/"), "x-org");
        assert_eq!(slugify("https://"), "page");
        assert!(slugify(&format!("https://a.com/{}", "x".repeat(200))).len() <= 80);
    }
}
