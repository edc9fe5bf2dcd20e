// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle trait shared by every adapter.

use async_trait::async_trait;

use crate::error::QuillError;

/// Identity and shutdown for channel and language-model adapters.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Releases held resources. Called once when the assistant loop stops.
    async fn shutdown(&self) -> Result<(), QuillError>;
}
