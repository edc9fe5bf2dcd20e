// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quill chat assistant.

use thiserror::Error;

/// The primary error type used across all Quill crates and adapter traits.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The invoking user omitted or malformed a required command argument.
    ///
    /// The message is the usage text shown back to the conversation.
    #[error("{0}")]
    Usage(String),

    /// Durable log storage errors (file I/O, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// External search producer failed to start or broke off mid-stream.
    #[error("producer error: {message}")]
    Producer {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Channel adapter errors (connection failure, delivery failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language-model or content endpoint errors.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Returns true for errors caused by user input rather than a fault.
    pub fn is_usage(&self) -> bool {
        matches!(self, QuillError::Usage(_))
    }
}
