// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only conversation log.
//!
//! Messages are buffered in memory per [`PartitionKey`](quill_core::PartitionKey)
//! and merged into one pretty-printed JSON array file per partition on each
//! flush. Reads see durable records followed by still-buffered ones.

pub mod file;
pub mod store;

pub use store::{FlushReport, LogStore, spawn_flush_task};
