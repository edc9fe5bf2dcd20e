// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared JSON POST with one retry on transient failures.

use std::time::Duration;

use quill_core::QuillError;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 1;
const RETRY_DELAY: Duration = Duration::from_secs(1);

pub(crate) fn provider_err(message: String, source: Option<reqwest::Error>) -> QuillError {
    QuillError::Provider {
        message,
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

pub(crate) fn build_client(headers: HeaderMap, timeout: Duration) -> Result<reqwest::Client, QuillError> {
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| provider_err(format!("failed to build HTTP client: {e}"), Some(e)))
}

fn is_transient(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

/// POSTs `body` as JSON to `url` and decodes the JSON response.
pub(crate) async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    body: &Req,
) -> Result<Resp, QuillError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let mut attempt = 0;
    loop {
        let response = client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| provider_err(format!("HTTP request to {url} failed: {e}"), Some(e)))?;

        let status = response.status();
        debug!(%status, attempt, url, "endpoint responded");

        if status.is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|e| provider_err(format!("unexpected response from {url}: {e}"), Some(e)));
        }

        let text = response.text().await.unwrap_or_default();
        if is_transient(status) && attempt < MAX_RETRIES {
            warn!(%status, body = %text, "transient endpoint error, retrying");
            attempt += 1;
            tokio::time::sleep(RETRY_DELAY).await;
            continue;
        }
        return Err(provider_err(format!("{url} returned {status}: {text}"), None));
    }
}
