// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use quill_core::QuillError;
use thiserror::Error;

/// Failure of a search session. No partial results accompany it.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("producer stdout unavailable")]
    NoStdout,

    #[error("reading producer output failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("writing results to {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SearchError> for QuillError {
    fn from(err: SearchError) -> Self {
        QuillError::Producer {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
