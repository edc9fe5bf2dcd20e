// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side queries over the conversation log.
//!
//! The free functions in [`search`] and [`stats`] work on plain record
//! slices; [`QueryEngine`] binds them to a [`LogStore`](quill_logstore::LogStore)
//! partition.

pub mod engine;
pub mod search;
pub mod stats;

pub use engine::{DEFAULT_RESULT_LIMIT, DEFAULT_SUMMARY_WINDOW, QueryEngine, transcript};
pub use search::{ScoredRecord, fuzzy_score, format_result_line};
pub use stats::{Ranked, Statistics};
