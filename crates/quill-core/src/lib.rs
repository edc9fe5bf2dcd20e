// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quill chat assistant.
//!
//! This crate provides the record and message types shared by every other
//! crate in the workspace, the [`QuillError`] taxonomy, and the adapter traits
//! implemented by channel and language-model integrations.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuillError;
pub use types::{
    Attachment, CommandKind, InboundMessage, MessageId, OutboundMessage, PartitionKey, PromptKind,
    Record, ReplyContext, Sender,
};

pub use traits::{ChannelAdapter, ContentAdapter, PluginAdapter, PromptAdapter, SummaryAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quill_error_has_all_variants() {
        let _config = QuillError::Config("test".into());
        let _usage = QuillError::Usage("test".into());
        let _storage = QuillError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _producer = QuillError::Producer {
            message: "test".into(),
            source: None,
        };
        let _channel = QuillError::Channel {
            message: "test".into(),
            source: None,
        };
        let _provider = QuillError::Provider {
            message: "test".into(),
            source: None,
        };
        let _timeout = QuillError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = QuillError::Internal("test".into());
    }

    #[test]
    fn usage_errors_are_flagged() {
        assert!(QuillError::Usage("x".into()).is_usage());
        assert!(!QuillError::Internal("x".into()).is_usage());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_summary_adapter<T: SummaryAdapter>() {}
        fn _assert_prompt_adapter<T: PromptAdapter>() {}
        fn _assert_content_adapter<T: ContentAdapter>() {}
    }
}
