// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the question/answer prompt endpoint.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::{PromptConfig, PromptProfileConfig};
use quill_core::{PluginAdapter, PromptAdapter, PromptKind, QuillError};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{build_client, post_json};

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    question: &'a str,
    context: &'a str,
    temperature: f32,
    tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    version: &'a str,
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    assistant: String,
}

/// Sends questions to `POST {base_url}/q`.
#[derive(Debug, Clone)]
pub struct PromptClient {
    client: reqwest::Client,
    url: String,
    ask: PromptProfileConfig,
    chat: PromptProfileConfig,
}

impl PromptClient {
    /// Returns `Ok(None)` when no prompt endpoint is configured.
    pub fn from_config(config: &PromptConfig) -> Result<Option<Self>, QuillError> {
        let Some(base) = &config.base_url else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: build_client(HeaderMap::new(), Duration::from_secs(300))?,
            url: format!("{}/q", base.trim_end_matches('/')),
            ask: config.ask.clone(),
            chat: config.chat.clone(),
        }))
    }

    fn profile(&self, kind: PromptKind) -> &PromptProfileConfig {
        match kind {
            PromptKind::Ask => &self.ask,
            PromptKind::Chat => &self.chat,
        }
    }
}

#[async_trait]
impl PluginAdapter for PromptClient {
    fn name(&self) -> &str {
        "prompt-endpoint"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl PromptAdapter for PromptClient {
    async fn ask(&self, kind: PromptKind, question: &str, context: &str) -> Result<String, QuillError> {
        let profile = self.profile(kind);
        let request = PromptRequest {
            question,
            context,
            temperature: profile.temperature,
            tokens: profile.tokens,
            model: profile.model.as_deref(),
            format: profile.format.as_deref(),
            version: &profile.version,
        };
        debug!(%kind, context_len = context.len(), "sending prompt");
        let response: PromptResponse = post_json(&self.client, &self.url, &request).await?;
        Ok(response.assistant)
    }
}
