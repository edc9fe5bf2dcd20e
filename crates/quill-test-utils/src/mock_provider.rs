// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted stand-in for the summary, prompt and content endpoints.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use quill_core::{
    ContentAdapter, PluginAdapter, PromptAdapter, PromptKind, QuillError, SummaryAdapter,
};
use tokio::sync::Mutex;

/// One request received by [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Summarize { transcript: String },
    Ask { kind: PromptKind, question: String, context: String },
    Fetch { url: String },
}

/// Answers every endpoint from one FIFO of scripted replies.
///
/// An empty queue answers `"mock response"`. A queued `Err` text is
/// returned as a provider error.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(
                responses.into_iter().map(|s| Ok(s.into())).collect(),
            )),
            calls: Arc::default(),
        }
    }

    pub async fn push_response(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(text.into()));
    }

    pub async fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(Err(message.into()));
    }

    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().await.clone()
    }

    async fn answer(&self, call: ProviderCall) -> Result<String, QuillError> {
        self.calls.lock().await.push(call);
        match self.replies.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(QuillError::Provider {
                message,
                source: None,
            }),
            None => Ok("mock response".to_string()),
        }
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl SummaryAdapter for MockProvider {
    async fn summarize(&self, transcript: &str) -> Result<String, QuillError> {
        self.answer(ProviderCall::Summarize {
            transcript: transcript.to_string(),
        })
        .await
    }
}

#[async_trait]
impl PromptAdapter for MockProvider {
    async fn ask(&self, kind: PromptKind, question: &str, context: &str) -> Result<String, QuillError> {
        self.answer(ProviderCall::Ask {
            kind,
            question: question.to_string(),
            context: context.to_string(),
        })
        .await
    }
}

#[async_trait]
impl ContentAdapter for MockProvider {
    async fn fetch_markdown(&self, url: &str) -> Result<String, QuillError> {
        self.answer(ProviderCall::Fetch {
            url: url.to_string(),
        })
        .await
    }
}
