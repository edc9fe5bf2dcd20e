// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation session state machine.

use std::collections::HashSet;

use tracing::trace;

use crate::assembler::LineAssembler;
use crate::pipeline::LinePipeline;

/// Lifecycle of one aggregation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting lines.
    Running,
    /// Quota reached or stop requested; input is ignored from here on.
    Terminating,
    /// Result delivered.
    Closed,
}

/// Result of a completed session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Unique cleaned lines in first-seen order.
    pub lines: Vec<String>,
    pub quota_reached: bool,
    /// The wall-clock limit expired before the producer finished.
    pub timed_out: bool,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-joined lines, as written to the results file.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Feeds producer output through the pipeline into a bounded unique set.
///
/// The session is pure: it never touches the producer. The driver watches
/// [`state`](Self::state) and stops the producer once it leaves `Running`.
#[derive(Debug)]
pub struct AggregationSession {
    pipeline: LinePipeline,
    assembler: LineAssembler,
    seen: HashSet<String>,
    lines: Vec<String>,
    quota: usize,
    state: SessionState,
    rejected: usize,
}

impl AggregationSession {
    pub fn new(pipeline: LinePipeline, quota: usize) -> Self {
        Self {
            pipeline,
            assembler: LineAssembler::new(),
            seen: HashSet::new(),
            lines: Vec::new(),
            quota,
            state: if quota == 0 {
                SessionState::Terminating
            } else {
                SessionState::Running
            },
            rejected: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Unique lines collected so far.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines dropped by the pipeline so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Consumes one chunk of producer output.
    ///
    /// Returns the state after the chunk. Lines that follow the one that
    /// filled the quota are not processed.
    pub fn feed(&mut self, chunk: &[u8]) -> SessionState {
        if self.state != SessionState::Running {
            return self.state;
        }
        for line in self.assembler.push(chunk) {
            self.accept(&line);
            if self.state != SessionState::Running {
                break;
            }
        }
        self.state
    }

    /// Stops accepting input without reaching the quota.
    pub fn halt(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Terminating;
        }
    }

    /// Closes the session and hands out its result.
    ///
    /// An unterminated final line is processed only if the session was
    /// still running when the stream ended.
    pub fn finish(&mut self) -> SearchOutcome {
        if self.state == SessionState::Running {
            if let Some(tail) = self.assembler.finish() {
                self.accept(&tail);
            }
        }
        let quota_reached = self.lines.len() >= self.quota;
        self.state = SessionState::Closed;
        self.seen.clear();
        SearchOutcome {
            lines: std::mem::take(&mut self.lines),
            quota_reached,
            timed_out: false,
        }
    }

    fn accept(&mut self, raw: &str) {
        match self.pipeline.run(raw) {
            Ok(cleaned) => {
                if cleaned.parse_fallback {
                    trace!(line = %cleaned.text, "object payload kept unparsed");
                }
                if self.seen.insert(cleaned.text.clone()) {
                    self.lines.push(cleaned.text);
                }
                if self.lines.len() >= self.quota {
                    self.state = SessionState::Terminating;
                }
            }
            Err(reason) => {
                self.rejected += 1;
                trace!(%reason, "line rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(quota: usize) -> AggregationSession {
        AggregationSession::new(LinePipeline::new("preview\""), quota)
    }

    fn line(s: &str) -> String {
        format!("{{\"preview\":\"{s}\"}}\n")
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        let mut s = session(10);
        let input = format!("{}{}{}", line("b"), line("a"), line("b"));
        s.feed(input.as_bytes());
        let out = s.finish();
        assert_eq!(out.lines, vec!["b", "a"]);
        assert!(!out.quota_reached);
        assert_eq!(s.state(), SessionState::Closed);
    }

    #[test]
    fn quota_stops_mid_chunk() {
        let mut s = session(2);
        let input = format!("{}{}{}", line("1"), line("2"), line("3"));
        assert_eq!(s.feed(input.as_bytes()), SessionState::Terminating);
        assert_eq!(s.feed(line("4").as_bytes()), SessionState::Terminating);
        let out = s.finish();
        assert_eq!(out.lines, vec!["1", "2"]);
        assert!(out.quota_reached);
    }

    #[test]
    fn tail_is_processed_at_stream_end() {
        let mut s = session(10);
        s.feed(br#"preview":"tail"}"#);
        assert!(s.is_empty());
        assert_eq!(s.finish().lines, vec!["tail"]);
    }

    #[test]
    fn tail_is_ignored_after_termination() {
        let mut s = session(1);
        s.feed(format!("{}preview\":\"x\"}}", line("1")).as_bytes());
        assert_eq!(s.finish().lines, vec!["1"]);
    }

    #[test]
    fn halted_session_ignores_input() {
        let mut s = session(10);
        s.feed(line("1").as_bytes());
        s.halt();
        s.feed(line("2").as_bytes());
        let out = s.finish();
        assert_eq!(out.lines, vec!["1"]);
        assert!(!out.quota_reached);
    }

    #[test]
    fn rejected_lines_are_counted() {
        let mut s = session(10);
        s.feed(b"garbage\nURL: preview\":\"URL: x\"}\n");
        assert_eq!(s.rejected(), 2);
        assert!(s.finish().is_empty());
    }
}
