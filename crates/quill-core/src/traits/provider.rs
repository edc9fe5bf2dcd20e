// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the language-model and content endpoints.
//!
//! These are thin request/response boundaries; implementations live in
//! `quill-llm` and the test mocks in `quill-test-utils`.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PromptKind;

/// Summarizes a chat transcript.
#[async_trait]
pub trait SummaryAdapter: PluginAdapter {
    /// Returns a summary of `transcript` (one `author: text` line per message).
    async fn summarize(&self, transcript: &str) -> Result<String, QuillError>;
}

/// Answers free-form questions through the prompt endpoint.
#[async_trait]
pub trait PromptAdapter: PluginAdapter {
    /// Sends `question` with the profile selected by `kind`.
    ///
    /// `context` is extra background text; empty for plain questions.
    async fn ask(&self, kind: PromptKind, question: &str, context: &str)
    -> Result<String, QuillError>;
}

/// Fetches a web page rendered as markdown.
#[async_trait]
pub trait ContentAdapter: PluginAdapter {
    async fn fetch_markdown(&self, url: &str) -> Result<String, QuillError>;
}
