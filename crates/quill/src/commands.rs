// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot `search` and `stats` subcommands.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use quill_config::QuillConfig;
use quill_core::{PartitionKey, QuillError};
use quill_logstore::LogStore;
use quill_query::QueryEngine;
use quill_search::StreamAggregator;

/// Runs one aggregation session and prints its lines to stdout.
pub async fn run_search(config: &QuillConfig, term: &str) -> Result<(), QuillError> {
    let aggregator = StreamAggregator::from_config(&config.search);
    let outcome = aggregator.run(term).await?;

    for line in &outcome.lines {
        println!("{line}");
    }
    eprintln!(
        "{} unique lines (quota {}{}{})",
        outcome.lines.len(),
        aggregator.quota(),
        if outcome.quota_reached { ", reached" } else { "" },
        if outcome.timed_out { ", timed out" } else { "" },
    );
    Ok(())
}

/// Prints statistics for the durable partition of `conversation` on `day`.
pub async fn run_stats(
    config: &QuillConfig,
    conversation: &str,
    day: Option<NaiveDate>,
) -> Result<(), QuillError> {
    let store = Arc::new(LogStore::from_config(&config.logs));
    let day = day.unwrap_or_else(|| Utc::now().date_naive());
    let partition = PartitionKey::new(conversation, day);
    if !store.partition_path(&partition).exists() {
        return Err(QuillError::Usage(format!(
            "no log file for {partition} at {}",
            store.partition_path(&partition).display()
        )));
    }

    let engine = QueryEngine::new(store, config.query.result_limit);
    let stats = engine.statistics(&partition, &Local).await?;
    println!("{stats}");
    Ok(())
}
