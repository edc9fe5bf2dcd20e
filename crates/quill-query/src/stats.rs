// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate usage statistics for one log partition.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use chrono::{TimeZone, Timelike};
use quill_core::Record;
use regex::Regex;

const TOP_AUTHORS: usize = 5;
const TOP_TOKENS: usize = 10;
const TOP_HOURS: usize = 3;
const TOP_COMMANDS: usize = 5;

static TOKEN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,!.?;:()]+").expect("valid regex"));

/// A ranked key with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<T> {
    pub key: T,
    pub count: usize,
}

/// Usage statistics computed over a partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub distinct_authors: usize,
    pub top_authors: Vec<Ranked<String>>,
    /// Mean body length in characters; `0.0` for an empty partition.
    pub average_length: f64,
    pub top_tokens: Vec<Ranked<String>>,
    /// Hours of day (0-23) in the requested time zone.
    pub top_hours: Vec<Ranked<u32>>,
    pub top_commands: Vec<Ranked<String>>,
}

/// Counts occurrences, remembering first-seen order for tie breaks.
struct Counter<T> {
    order: Vec<Ranked<T>>,
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> Counter<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: T) {
        match self.index.get(&key) {
            Some(&i) => self.order[i].count += 1,
            None => {
                self.index.insert(key.clone(), self.order.len());
                self.order.push(Ranked { key, count: 1 });
            }
        }
    }

    fn distinct(&self) -> usize {
        self.order.len()
    }

    fn top(mut self, n: usize) -> Vec<Ranked<T>> {
        self.order.sort_by(|a, b| b.count.cmp(&a.count));
        self.order.truncate(n);
        self.order
    }
}

impl Statistics {
    /// Computes statistics, bucketing message hours in `tz`.
    pub fn compute<Tz: TimeZone>(records: &[Record], tz: &Tz) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut authors = Counter::new();
        let mut tokens = Counter::new();
        let mut hours = Counter::new();
        let mut commands = Counter::new();
        let mut total_chars = 0usize;

        for record in records {
            authors.add(record.author().to_string());

            let body = record.body();
            total_chars += body.chars().count();

            for token in TOKEN_SPLIT.split(&body.to_lowercase()) {
                if !token.is_empty() {
                    tokens.add(token.to_string());
                }
            }

            if let Some(ts) = record.timestamp() {
                hours.add(ts.with_timezone(tz).hour());
            }

            let trimmed = body.trim();
            if trimmed.starts_with('!') || trimmed.starts_with('/') {
                if let Some(cmd) = trimmed.split_whitespace().next() {
                    commands.add(cmd.to_string());
                }
            }
        }

        Self {
            total: records.len(),
            distinct_authors: authors.distinct(),
            top_authors: authors.top(TOP_AUTHORS),
            average_length: total_chars as f64 / records.len() as f64,
            top_tokens: tokens.top(TOP_TOKENS),
            top_hours: hours.top(TOP_HOURS),
            top_commands: commands.top(TOP_COMMANDS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn join_or_na<T>(items: &[Ranked<T>], sep: &str, f: impl Fn(&Ranked<T>) -> String) -> String {
    if items.is_empty() {
        return "N/A".to_string();
    }
    items.iter().map(f).collect::<Vec<_>>().join(sep)
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No messages logged yet for today.");
        }
        writeln!(f, "Today's stats:")?;
        writeln!(f, "• Total messages: {}", self.total)?;
        writeln!(f, "• Unique participants: {}", self.distinct_authors)?;
        writeln!(f, "• Top participants:")?;
        for author in &self.top_authors {
            writeln!(f, "{}: {} messages", author.key, author.count)?;
        }
        writeln!(f)?;
        writeln!(f, "• Avg message length: {:.2} chars", self.average_length)?;
        writeln!(
            f,
            "• Top 10 words: {}",
            join_or_na(&self.top_tokens, ", ", |t| format!("{} ({})", t.key, t.count))
        )?;
        writeln!(f, "• Top 3 hours (local time):")?;
        writeln!(
            f,
            "{}",
            join_or_na(&self.top_hours, "\n", |h| format!("{}:00 - {} msg", h.key, h.count))
        )?;
        writeln!(f)?;
        write!(
            f,
            "• Top 5 commands: {}",
            join_or_na(&self.top_commands, ", ", |c| format!("{} ({})", c.key, c.count))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn rec(user: Option<&str>, date: &str, text: Option<&str>) -> Record {
        Record {
            message_id: 0,
            date: date.into(),
            text: text.map(String::from),
            sender_id: None,
            sender_username: user.map(String::from),
            sender_first_name: None,
            sender_last_name: None,
        }
    }

    #[test]
    fn empty_partition_is_well_defined() {
        let stats = Statistics::compute(&[], &Utc);
        assert!(stats.is_empty());
        assert_eq!(stats.average_length, 0.0);
        assert_eq!(stats.to_string(), "No messages logged yet for today.");
    }

    #[test]
    fn rankings_break_ties_by_first_seen() {
        let records = vec![
            rec(Some("bob"), "2026-03-01T10:00:00Z", Some("hi there")),
            rec(Some("ann"), "2026-03-01T11:00:00Z", Some("hi")),
            rec(Some("ann"), "2026-03-01T11:30:00Z", Some("there")),
            rec(Some("bob"), "2026-03-01T12:00:00Z", Some("yo")),
        ];
        let stats = Statistics::compute(&records, &Utc);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.distinct_authors, 2);
        let authors: Vec<_> = stats.top_authors.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(authors, vec!["bob", "ann"]);
        let tokens: Vec<_> = stats.top_tokens.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(tokens, vec!["hi", "there", "yo"]);
        assert_eq!(stats.top_hours[0], Ranked { key: 11, count: 2 });
    }

    #[test]
    fn hours_follow_time_zone_and_skip_bad_dates() {
        let records = vec![
            rec(None, "2026-03-01T23:00:00Z", Some("late")),
            rec(None, "not a date", Some("skipped")),
        ];
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let stats = Statistics::compute(&records, &tz);
        assert_eq!(stats.top_hours, vec![Ranked { key: 1, count: 1 }]);
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn commands_and_lengths() {
        let records = vec![
            rec(None, "2026-03-01T10:00:00Z", Some("  !q what is rust")),
            rec(None, "2026-03-01T10:00:00Z", Some("/z term")),
            rec(None, "2026-03-01T10:00:00Z", Some("!q again")),
            rec(None, "2026-03-01T10:00:00Z", None),
        ];
        let stats = Statistics::compute(&records, &Utc);
        assert_eq!(
            stats.top_commands,
            vec![
                Ranked { key: "!q".to_string(), count: 2 },
                Ranked { key: "/z".to_string(), count: 1 },
            ]
        );
        assert_eq!(stats.top_authors[0].key, "User");
        // 17 + 7 + 8 + 0 characters over 4 records.
        assert!((stats.average_length - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_counts_characters_not_bytes() {
        let records = vec![rec(None, "2026-03-01T10:00:00Z", Some("héé"))];
        assert_eq!(Statistics::compute(&records, &Utc).average_length, 3.0);
    }

    #[test]
    fn rendering_includes_sections() {
        let records = vec![rec(Some("ann"), "2026-03-01T10:00:00Z", Some("hello"))];
        let text = Statistics::compute(&records, &Utc).to_string();
        assert!(text.starts_with("Today's stats:"));
        assert!(text.contains("ann: 1 messages"));
        assert!(text.contains("• Avg message length: 5.00 chars"));
        assert!(text.contains("10:00 - 1 msg"));
        assert!(text.ends_with("• Top 5 commands: N/A"));
    }
}
