// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completion client used for transcript summaries.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::SummaryConfig;
use quill_core::{PluginAdapter, QuillError, SummaryAdapter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::http::{build_client, post_json};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Summarizes transcripts through `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    url: String,
    config: SummaryConfig,
}

impl ChatCompletionClient {
    pub fn new(config: SummaryConfig) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| QuillError::Config(format!("invalid summary.api_key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = build_client(headers, Duration::from_secs(300))?;
        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            url,
            config,
        })
    }
}

#[async_trait]
impl PluginAdapter for ChatCompletionClient {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl SummaryAdapter for ChatCompletionClient {
    async fn summarize(&self, transcript: &str) -> Result<String, QuillError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: transcript,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };
        let response: ChatResponse = post_json(&self.client, &self.url, &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| QuillError::Provider {
                message: "chat completion returned no content".into(),
                source: None,
            })
    }
}
