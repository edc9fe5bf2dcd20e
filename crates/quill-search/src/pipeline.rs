// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-line cleaning of producer output.
//!
//! A raw line passes through a fixed sequence of pure stages. Any stage may
//! reject the line; the survivors are normalized result lines.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use strum::Display;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{3,}").expect("valid regex"));

const ABSENT: &str = "[--]";

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// The marker does not occur in the line.
    NoMarker,
    /// Contains `https://` but fewer than two colons overall.
    BareUrl,
    /// Three or more consecutive whitespace characters.
    WhitespaceRun,
    /// Contains `URL:`, `TITLE:` or a tab.
    Forbidden,
}

/// A line that survived the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    pub text: String,
    /// The payload looked like a JSON object but did not parse; the raw
    /// text was kept.
    pub parse_fallback: bool,
}

/// Fields picked out of object payloads. Anything else is ignored.
#[derive(Debug, Deserialize)]
struct Entry {
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    email_domain: Option<String>,
    email: Option<String>,
    password_plaintext: Option<String>,
    password: Option<String>,
    target_domain: Option<String>,
}

impl Entry {
    fn render(&self) -> String {
        let or_absent = |v: &Option<String>| v.clone().unwrap_or_else(|| ABSENT.to_string());
        format!(
            "{}:{}:{}:({}):{}:{}:https://{}",
            or_absent(&self.first_name),
            or_absent(&self.last_name),
            or_absent(&self.username),
            self.email_domain.as_deref().unwrap_or(""),
            or_absent(&self.email),
            self.password_plaintext
                .as_deref()
                .or(self.password.as_deref())
                .unwrap_or(ABSENT),
            or_absent(&self.target_domain),
        )
    }
}

/// The line cleaning pipeline for one marker.
#[derive(Debug, Clone)]
pub struct LinePipeline {
    marker: String,
}

impl LinePipeline {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn run(&self, raw: &str) -> Result<Cleaned, Rejection> {
        let text = after_marker(raw.trim(), &self.marker)?;
        let text = strip_framing(text);
        reject_bare_url(&text)?;
        reject_whitespace_run(&text)?;
        reject_forbidden(&text)?;
        Ok(normalize_structured(text))
    }
}

/// Everything after the first occurrence of `marker`.
pub fn after_marker<'a>(line: &'a str, marker: &str) -> Result<&'a str, Rejection> {
    line.find(marker)
        .map(|idx| &line[idx + marker.len()..])
        .ok_or(Rejection::NoMarker)
}

/// Removes the record framing the producer wraps around each payload.
pub fn strip_framing(payload: &str) -> String {
    let mut text = payload.replacen("\n\"}\n", "", 1).replace(",\"\"", "");
    if let Some(rest) = text.strip_prefix(":{") {
        text = format!("{{{rest}");
    } else if let Some(rest) = text.strip_prefix(":\"") {
        text = rest.replacen("\"}", "", 1);
    } else {
        text = text.replacen("\"}", "", 1);
    }
    text
}

pub fn reject_bare_url(text: &str) -> Result<(), Rejection> {
    if text.contains("https://") && text.matches(':').count() < 2 {
        return Err(Rejection::BareUrl);
    }
    Ok(())
}

pub fn reject_whitespace_run(text: &str) -> Result<(), Rejection> {
    if WHITESPACE_RUN.is_match(text) {
        return Err(Rejection::WhitespaceRun);
    }
    Ok(())
}

pub fn reject_forbidden(text: &str) -> Result<(), Rejection> {
    if text.contains("URL:") || text.contains("TITLE:") || text.contains('\t') {
        return Err(Rejection::Forbidden);
    }
    Ok(())
}

/// Renders `{"..."}` object payloads as a colon-separated entry.
pub fn normalize_structured(text: String) -> Cleaned {
    if !text.starts_with("{\"") {
        return Cleaned {
            text,
            parse_fallback: false,
        };
    }
    // The object is usually followed by the closing brace of the record it
    // was embedded in. Only braces and whitespace may trail the first value.
    let mut values = serde_json::Deserializer::from_str(&text).into_iter::<Entry>();
    let first = values.next();
    let trailing_ok = text[values.byte_offset()..]
        .chars()
        .all(|c| c == '}' || c.is_whitespace());
    match first {
        Some(Ok(entry)) if trailing_ok => Cleaned {
            text: entry.render(),
            parse_fallback: false,
        },
        _ => Cleaned {
            text,
            parse_fallback: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> Result<String, Rejection> {
        LinePipeline::new("preview\"").run(line).map(|c| c.text)
    }

    #[test]
    fn string_payload() {
        assert_eq!(run(r#"preview":"hello world"}"#).unwrap(), "hello world");
        assert_eq!(
            run(r#"  {"id":1,"preview":"alice:secret"}  "#).unwrap(),
            "alice:secret"
        );
    }

    #[test]
    fn object_payload_is_rendered() {
        assert_eq!(
            run(r#"preview":{"first_name":"A","email":"a@b.com"}"#).unwrap(),
            "A:[--]:[--]:():a@b.com:[--]:https://[--]"
        );
    }

    #[test]
    fn object_payload_prefers_plaintext_password() {
        let line = r#"preview":{"username":"u","email_domain":"b.com","password":"h","password_plaintext":"p","target_domain":"x.io"}"#;
        assert_eq!(run(line).unwrap(), "[--]:[--]:u:(b.com):[--]:p:https://x.io");
    }

    #[test]
    fn object_payload_inside_record_framing() {
        assert_eq!(
            run(r#"{"id":7,"preview":{"username":"u","target_domain":"t.io"}}"#).unwrap(),
            "[--]:[--]:u:():[--]:[--]:https://t.io"
        );
    }

    #[test]
    fn malformed_object_falls_back_to_raw() {
        let cleaned = LinePipeline::new("preview\"")
            .run(r#"preview":{"first_name":5}"#)
            .unwrap();
        assert!(cleaned.parse_fallback);
        assert_eq!(cleaned.text, r#"{"first_name":5}"#);
    }

    #[test]
    fn trailing_garbage_after_object_falls_back_to_raw() {
        let cleaned = normalize_structured(r#"{"first_name":"A"}garbage"#.to_string());
        assert!(cleaned.parse_fallback);
        assert_eq!(cleaned.text, r#"{"first_name":"A"}garbage"#);

        let framed = normalize_structured("{\"first_name\":\"A\"}} ".to_string());
        assert!(!framed.parse_fallback);
        assert!(framed.text.starts_with("A:"));
    }

    #[test]
    fn empty_fields_are_removed() {
        assert_eq!(run(r#"preview":"a,"",b"}"#).unwrap(), "a,b");
    }

    #[test]
    fn rejections() {
        assert_eq!(run("no marker here"), Err(Rejection::NoMarker));
        assert_eq!(run(r#"preview":"https//x https://y"}"#), Err(Rejection::BareUrl));
        assert_eq!(run(r#"preview":"a   b"}"#), Err(Rejection::WhitespaceRun));
        assert_eq!(run(r#"preview":"URL: x"}"#), Err(Rejection::Forbidden));
        assert_eq!(run(r#"preview":"TITLE:x"}"#), Err(Rejection::Forbidden));
        assert_eq!(run("preview\":\"a\tb\"}"), Err(Rejection::Forbidden));
    }

    #[test]
    fn url_with_enough_colons_passes() {
        assert_eq!(
            run(r#"preview":"https://site.io:user:pass"}"#).unwrap(),
            "https://site.io:user:pass"
        );
    }

    #[test]
    fn marker_is_configurable() {
        let pipeline = LinePipeline::new("DATA=");
        assert_eq!(pipeline.run("x DATA=payload").unwrap().text, "payload");
    }
}
