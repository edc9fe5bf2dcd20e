// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partition-bound query engine.

use std::sync::Arc;

use chrono::TimeZone;
use quill_core::{PartitionKey, QuillError, Record};
use quill_logstore::LogStore;
use tracing::debug;

use crate::search::{self, ScoredRecord};
use crate::stats::Statistics;

pub const DEFAULT_RESULT_LIMIT: usize = 10;
pub const DEFAULT_SUMMARY_WINDOW: usize = 200;

/// Runs queries against the full record sequence of a partition.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<LogStore>,
    result_limit: usize,
}

impl QueryEngine {
    pub fn new(store: Arc<LogStore>, result_limit: usize) -> Self {
        Self {
            store,
            result_limit,
        }
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    async fn records(&self, partition: &PartitionKey) -> Result<Vec<Record>, QuillError> {
        let records = self.store.read_all(partition).await?;
        debug!(partition = %partition, records = records.len(), "partition loaded for query");
        Ok(records)
    }

    /// Case-insensitive substring search; newest matches, oldest first.
    pub async fn substring_search(
        &self,
        partition: &PartitionKey,
        query: &str,
    ) -> Result<Vec<Record>, QuillError> {
        if query.trim().is_empty() {
            return search::substring_matches(&[], query, self.result_limit);
        }
        let records = self.records(partition).await?;
        search::substring_matches(&records, query, self.result_limit)
    }

    /// Subsequence fuzzy search; best matches first.
    pub async fn fuzzy_search(
        &self,
        partition: &PartitionKey,
        query: &str,
    ) -> Result<Vec<ScoredRecord>, QuillError> {
        if query.trim().is_empty() {
            return search::fuzzy_matches(&[], query, self.result_limit);
        }
        let records = self.records(partition).await?;
        search::fuzzy_matches(&records, query, self.result_limit)
    }

    pub async fn statistics<Tz: TimeZone>(
        &self,
        partition: &PartitionKey,
        tz: &Tz,
    ) -> Result<Statistics, QuillError> {
        let records = self.records(partition).await?;
        Ok(Statistics::compute(&records, tz))
    }

    /// The last `window` records as `author: text` lines.
    pub async fn recent_transcript(
        &self,
        partition: &PartitionKey,
        window: usize,
    ) -> Result<String, QuillError> {
        let records = self.records(partition).await?;
        Ok(transcript(&records, window))
    }
}

/// Renders the last `window` records as `author: text` lines.
pub fn transcript(records: &[Record], window: usize) -> String {
    let start = records.len().saturating_sub(window);
    records[start..]
        .iter()
        .map(|r| format!("{}: {}", r.author(), r.body()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_keeps_last_window() {
        let records: Vec<Record> = (0..5)
            .map(|i| Record {
                message_id: i,
                date: String::new(),
                text: Some(format!("m{i}")),
                sender_id: None,
                sender_username: None,
                sender_first_name: Some("Ann".into()),
                sender_last_name: None,
            })
            .collect();
        assert_eq!(transcript(&records, 2), "Ann: m3\nAnn: m4");
        assert_eq!(transcript(&records, 0), "");
        assert_eq!(transcript(&records, 100).lines().count(), 5);
    }
}
