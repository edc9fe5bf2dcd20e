// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming external search.
//!
//! An external producer process writes semi-structured lines to stdout.
//! [`StreamAggregator`] reads its output in chunks, rebuilds lines across
//! chunk boundaries, cleans each line through [`LinePipeline`], keeps the
//! unique survivors, and stops the producer once the quota is reached.

pub mod aggregator;
pub mod assembler;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod producer;
pub mod session;

pub use aggregator::StreamAggregator;
pub use assembler::LineAssembler;
pub use error::SearchError;
pub use output::write_results;
pub use pipeline::{Cleaned, LinePipeline, Rejection};
pub use producer::{ChildProducer, ProducerControl};
pub use session::{AggregationSession, SearchOutcome, SessionState};
