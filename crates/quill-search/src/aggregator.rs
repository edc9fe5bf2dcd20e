// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives an [`AggregationSession`] from a producer's output stream.

use std::time::Duration;

use quill_config::model::SearchConfig;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::pipeline::LinePipeline;
use crate::producer::{ChildProducer, ChunkReceiver, ProducerControl};
use crate::session::{AggregationSession, SearchOutcome, SessionState};

/// Runs external searches with a bounded, deduplicated result.
#[derive(Debug, Clone)]
pub struct StreamAggregator {
    program: String,
    args: Vec<String>,
    marker: String,
    quota: usize,
    timeout: Option<Duration>,
    grace: Duration,
}

impl StreamAggregator {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            marker: config.marker.clone(),
            quota: config.quota,
            timeout: config
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            grace: Duration::from_secs(config.terminate_grace_secs),
        }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Spawns the producer for `term` and aggregates its output.
    pub async fn run(&self, term: &str) -> Result<SearchOutcome, SearchError> {
        let (producer, chunks) = ChildProducer::spawn(&self.program, &self.args, term)?;
        let outcome = self.drive(chunks, producer).await?;
        info!(
            term,
            lines = outcome.lines.len(),
            quota_reached = outcome.quota_reached,
            timed_out = outcome.timed_out,
            "external search finished"
        );
        Ok(outcome)
    }

    /// Consumes `chunks` until the stream ends, stopping `producer` once the
    /// session stops accepting lines.
    ///
    /// After a stop request the stream is drained for at most the grace
    /// period; then the producer is killed and the stream abandoned.
    pub async fn drive<P: ProducerControl>(
        &self,
        mut chunks: ChunkReceiver,
        mut producer: P,
    ) -> Result<SearchOutcome, SearchError> {
        let mut session = AggregationSession::new(LinePipeline::new(&self.marker), self.quota);
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut stop_sent: Option<Instant> = None;
        let mut timed_out = false;

        if session.state() == SessionState::Terminating {
            stop(&mut producer);
            stop_sent = Some(Instant::now());
        }

        loop {
            let wake = match stop_sent {
                Some(at) => Some(at + self.grace),
                None => deadline,
            };
            let next = match wake {
                Some(at) => match tokio::time::timeout_at(at, chunks.recv()).await {
                    Ok(next) => next,
                    Err(_) if stop_sent.is_some() => {
                        warn!(grace = ?self.grace, "producer ignored stop request, killing it");
                        if let Err(e) = producer.force_kill() {
                            warn!(error = %e, "failed to kill search producer");
                        }
                        break;
                    }
                    Err(_) => {
                        warn!(timeout = ?self.timeout, "external search timed out");
                        timed_out = true;
                        session.halt();
                        stop(&mut producer);
                        stop_sent = Some(Instant::now());
                        continue;
                    }
                },
                None => chunks.recv().await,
            };

            match next {
                None => break,
                Some(Ok(chunk)) => {
                    let state = session.feed(&chunk);
                    if state == SessionState::Terminating && stop_sent.is_none() {
                        info!(quota = self.quota, "search quota reached, stopping producer");
                        stop(&mut producer);
                        stop_sent = Some(Instant::now());
                    }
                }
                Some(Err(e)) => {
                    if let Err(kill_err) = producer.force_kill() {
                        debug!(error = %kill_err, "kill after read failure");
                    }
                    producer.reap().await;
                    return Err(SearchError::Read(e));
                }
            }
        }

        drop(chunks);
        let mut outcome = session.finish();
        outcome.timed_out = timed_out;
        debug!(rejected = session.rejected(), "session closed");
        producer.reap().await;
        Ok(outcome)
    }
}

fn stop<P: ProducerControl>(producer: &mut P) {
    if let Err(e) = producer.request_stop() {
        warn!(error = %e, "failed to signal search producer");
    }
}
