// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buffered log store and its flush loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use quill_config::model::LogsConfig;
use quill_core::{PartitionKey, QuillError, Record};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::file::{self, Loaded};

/// Totals of one flush pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub partitions_written: usize,
    pub records_written: usize,
    pub partitions_failed: usize,
}

/// Append-only message log, one sequence per conversation and day.
///
/// `append` only touches the in-memory buffer. `flush` and `read_all` share
/// an I/O lock so a reader never sees a record both on disk and in the
/// buffer.
pub struct LogStore {
    directory: PathBuf,
    pending: DashMap<PartitionKey, Vec<Record>>,
    io_lock: Mutex<()>,
}

impl LogStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pending: DashMap::new(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &LogsConfig) -> Self {
        Self::new(&config.directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Durable file backing `partition`.
    pub fn partition_path(&self, partition: &PartitionKey) -> PathBuf {
        self.directory.join(partition.file_name())
    }

    /// Buffers a record. Never blocks on I/O and never fails.
    pub fn append(&self, partition: PartitionKey, record: Record) {
        self.pending.entry(partition).or_default().push(record);
    }

    /// Number of records not yet written to disk.
    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(|entry| entry.value().len()).sum()
    }

    /// Durable records of `partition` followed by its buffered records.
    ///
    /// A corrupt durable file reads as empty; it is left untouched until the
    /// next flush moves it aside.
    pub async fn read_all(&self, partition: &PartitionKey) -> Result<Vec<Record>, QuillError> {
        let _guard = self.io_lock.lock().await;
        let mut records = match file::load(&self.partition_path(partition)).await? {
            Loaded::Corrupt(e) => {
                warn!(partition = %partition, error = %e, "reading corrupt partition as empty");
                Vec::new()
            }
            loaded => loaded.into_records(),
        };
        if let Some(buffered) = self.pending.get(partition) {
            records.extend(buffered.iter().cloned());
        }
        Ok(records)
    }

    /// Merges every buffered partition into its durable file.
    ///
    /// Records appended while a partition is being written stay buffered for
    /// the next pass. A partition whose write fails keeps all its records.
    pub async fn flush(&self) -> FlushReport {
        let _guard = self.io_lock.lock().await;
        let mut report = FlushReport::default();

        let mut keys: Vec<PartitionKey> = self
            .pending
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();

        for key in keys {
            let snapshot: Vec<Record> = match self.pending.get(&key) {
                Some(buffered) => buffered.clone(),
                None => continue,
            };
            if snapshot.is_empty() {
                continue;
            }

            match self.write_partition(&key, &snapshot).await {
                Ok(()) => {
                    self.drain_written(&key, snapshot.len());
                    report.partitions_written += 1;
                    report.records_written += snapshot.len();
                    debug!(partition = %key, records = snapshot.len(), "partition flushed");
                }
                Err(e) => {
                    report.partitions_failed += 1;
                    warn!(
                        partition = %key,
                        records = snapshot.len(),
                        error = %e,
                        "partition flush failed, records kept for retry"
                    );
                }
            }
        }

        if report.partitions_written > 0 || report.partitions_failed > 0 {
            info!(
                partitions = report.partitions_written,
                records = report.records_written,
                failed = report.partitions_failed,
                "log flush complete"
            );
        }
        report
    }

    async fn write_partition(&self, key: &PartitionKey, batch: &[Record]) -> Result<(), QuillError> {
        let path = self.partition_path(key);
        let mut records = match file::load(&path).await? {
            Loaded::Corrupt(e) => {
                file::preserve_corrupt(&path, &e).await?;
                Vec::new()
            }
            loaded => loaded.into_records(),
        };
        records.extend_from_slice(batch);
        file::write(&path, &records).await
    }

    /// Removes the first `written` records of `key`, dropping the entry once empty.
    fn drain_written(&self, key: &PartitionKey, written: usize) {
        let now_empty = match self.pending.get_mut(key) {
            Some(mut buffered) => {
                let n = written.min(buffered.len());
                buffered.drain(..n);
                buffered.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.pending.remove_if(key, |_, buffered| buffered.is_empty());
        }
    }
}

/// Flushes `store` every `interval` until `cancel` fires, then flushes once more.
pub fn spawn_flush_task(
    store: Arc<LogStore>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    store.flush().await;
                }
                _ = cancel.cancelled() => {
                    info!(pending = store.pending_count(), "final log flush");
                    store.flush().await;
                    break;
                }
            }
        }
    })
}
