// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Substring and fuzzy matching over record bodies.

use quill_core::{QuillError, Record};

/// A record with its fuzzy match score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f64,
}

fn require_query(query: &str, usage: &str) -> Result<(), QuillError> {
    if query.trim().is_empty() {
        return Err(QuillError::Usage(usage.to_string()));
    }
    Ok(())
}

/// Fraction of `query`'s characters found in order within `text`.
///
/// Both sides are lower-cased and scanned once, left to right, without
/// backtracking. Returns `None` for an empty query.
pub fn fuzzy_score(text: &str, query: &str) -> Option<f64> {
    let needle: Vec<char> = query.to_lowercase().chars().collect();
    if needle.is_empty() {
        return None;
    }

    let mut matched = 0;
    for c in text.to_lowercase().chars() {
        if matched < needle.len() && c == needle[matched] {
            matched += 1;
        }
    }
    Some(matched as f64 / needle.len() as f64)
}

/// The most recent `limit` records whose body contains `query`, oldest first.
pub fn substring_matches(
    records: &[Record],
    query: &str,
    limit: usize,
) -> Result<Vec<Record>, QuillError> {
    require_query(query, "Please provide a search keyword.")?;
    let needle = query.to_lowercase();
    let matches: Vec<&Record> = records
        .iter()
        .filter(|r| r.body().to_lowercase().contains(&needle))
        .collect();
    let skip = matches.len().saturating_sub(limit);
    Ok(matches.into_iter().skip(skip).cloned().collect())
}

/// The `limit` best fuzzy matches, best first; equal scores keep log order.
pub fn fuzzy_matches(
    records: &[Record],
    query: &str,
    limit: usize,
) -> Result<Vec<ScoredRecord>, QuillError> {
    require_query(
        query,
        "Please provide a query to fuzzy search for, e.g. !fsearch something",
    )?;
    let mut scored: Vec<ScoredRecord> = records
        .iter()
        .filter_map(|record| {
            let score = fuzzy_score(record.body(), query)?;
            (score > 0.0).then(|| ScoredRecord {
                record: record.clone(),
                score,
            })
        })
        .collect();
    // sort_by is stable, so ties stay in log order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    Ok(scored)
}

/// `[author at date]: text`, the line format of search replies.
pub fn format_result_line(record: &Record) -> String {
    format!("[{} at {}]: {}", record.author(), record.date, record.body())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, text: &str) -> Record {
        Record {
            message_id: id,
            date: format!("2026-03-01T10:{:02}:00.000Z", id),
            text: Some(text.into()),
            sender_id: None,
            sender_username: Some("ann".into()),
            sender_first_name: None,
            sender_last_name: None,
        }
    }

    #[test]
    fn fuzzy_score_examples() {
        assert_eq!(fuzzy_score("Hello World", "hlo"), Some(1.0));
        assert_eq!(fuzzy_score("abc", "abd"), Some(2.0 / 3.0));
        assert_eq!(fuzzy_score("anything", ""), None);
        assert_eq!(fuzzy_score("", "x"), Some(0.0));
    }

    #[test]
    fn fuzzy_score_does_not_backtrack() {
        // "ba" against "ab": 'b' is found at index 1, then no 'a' remains.
        assert_eq!(fuzzy_score("ab", "ba"), Some(0.5));
    }

    #[test]
    fn substring_keeps_most_recent_in_order() {
        let records: Vec<_> = (0..15).map(|i| rec(i, &format!("Rust {i}"))).collect();
        let hits = substring_matches(&records, "rust", 10).unwrap();
        assert_eq!(hits.len(), 10);
        assert_eq!(hits.first().unwrap().message_id, 5);
        assert_eq!(hits.last().unwrap().message_id, 14);
    }

    #[test]
    fn empty_queries_are_usage_errors() {
        let records = vec![rec(1, "x")];
        assert!(substring_matches(&records, "  ", 10).unwrap_err().is_usage());
        assert!(fuzzy_matches(&records, "", 10).unwrap_err().is_usage());
    }

    #[test]
    fn fuzzy_ties_keep_log_order() {
        let records = vec![rec(1, "cat"), rec(2, "dog"), rec(3, "cart"), rec(4, "act")];
        let hits = fuzzy_matches(&records, "cat", 10).unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.record.message_id).collect();
        // cat=1.0, cart=1.0, act=1/3 (only "c" matches in order), dog=0 dropped.
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn result_line_format() {
        assert_eq!(
            format_result_line(&rec(1, "hi")),
            "[ann at 2026-03-01T10:01:00.000Z]: hi"
        );
    }
}
