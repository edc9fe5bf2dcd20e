// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for the endpoints behind the summarize, ask, chat and fetch
//! commands.

pub mod content;
mod http;
pub mod prompt;
pub mod summary;

pub use content::ContentClient;
pub use prompt::PromptClient;
pub use summary::ChatCompletionClient;
