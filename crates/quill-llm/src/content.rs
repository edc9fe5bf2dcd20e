// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the page-to-markdown content endpoint.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::ContentConfig;
use quill_core::{ContentAdapter, PluginAdapter, QuillError};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::http::{build_client, post_json};

#[derive(Debug, Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    markdown: String,
}

/// Fetches pages as markdown through `POST {endpoint}` with `{"url": ...}`.
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ContentClient {
    /// Returns `Ok(None)` when no content endpoint is configured.
    pub fn from_config(config: &ContentConfig) -> Result<Option<Self>, QuillError> {
        let Some(endpoint) = &config.endpoint else {
            return Ok(None);
        };
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| QuillError::Config(format!("invalid content.api_key: {e}")))?;
            headers.insert("x-api-key", value);
        }
        Ok(Some(Self {
            client: build_client(headers, Duration::from_secs(120))?,
            endpoint: endpoint.clone(),
        }))
    }
}

#[async_trait]
impl PluginAdapter for ContentClient {
    fn name(&self) -> &str {
        "content-endpoint"
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl ContentAdapter for ContentClient {
    async fn fetch_markdown(&self, url: &str) -> Result<String, QuillError> {
        let response: ContentResponse =
            post_json(&self.client, &self.endpoint, &ContentRequest { url }).await?;
        Ok(response.markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_sends_key_and_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getcontent"))
            .and(header("x-api-key", "secret"))
            .and(body_json(serde_json::json!({"url": "https://example.com"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"markdown": "# Example"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentClient::from_config(&ContentConfig {
            endpoint: Some(format!("{}/getcontent", server.uri())),
            api_key: Some("secret".into()),
        })
        .unwrap()
        .unwrap();
        assert_eq!(
            client.fetch_markdown("https://example.com").await.unwrap(),
            "# Example"
        );
    }

    #[test]
    fn unconfigured_endpoint_yields_none() {
        assert!(ContentClient::from_config(&ContentConfig::default()).unwrap().is_none());
    }
}
