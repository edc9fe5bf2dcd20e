// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns Figment extraction failures into miette diagnostics.
//!
//! Unknown keys get a "did you mean" hint picked by Jaro-Winkler similarity
//! and, when the offending file can be identified, a labelled source span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity a known key must exceed before it is offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// One problem found while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(quill::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a quill setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(quill::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(quill::config::missing_key),
        help("set `{key}` in quill.toml or through a QUILL_ environment variable")
    )]
    MissingKey { key: String },

    #[error("invalid value: {message}")]
    #[diagnostic(code(quill::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(quill::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? expected one of: {valid_keys}"),
        None => format!("expected one of: {valid_keys}"),
    }
}

/// Converts every error carried by `err` into a [`ConfigError`].
///
/// `sources` pairs a display path with the file's text and is only used to
/// attach source spans to unknown-key errors.
pub fn from_figment(err: figment::Error, sources: &[(String, String)]) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let dotted = error
                .path
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(".");
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, field, sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: closest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: if dotted.is_empty() {
                        field.to_string()
                    } else {
                        format!("{dotted}.{field}")
                    },
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: dotted,
                    detail: format!("found {actual}"),
                    expected: expected.clone(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn locate(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error.metadata.as_ref().and_then(|m| m.source.as_ref());
    let wanted = match origin {
        Some(figment::Source::File(path)) => path.display().to_string(),
        // Inline strings carry no file path; fall back to the only source.
        _ if sources.len() == 1 => sources[0].0.clone(),
        _ => return (None, None),
    };

    let Some((name, text)) = sources.iter().find(|(p, _)| *p == wanted) else {
        return (None, None);
    };
    let section = error.path.join(".");
    let section = (!section.is_empty()).then_some(section.as_str());
    match key_offset(text, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, text.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `key = ...` inside `[section]`, or at top level when
/// `section` is `None`.
pub fn key_offset(text: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut in_section = section.is_none();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            let header = trimmed.trim_end().trim_start_matches('[').trim_end_matches(']');
            in_section = section == Some(header.trim());
        } else if in_section {
            if let Some(rest) = trimmed.strip_prefix(key) {
                if rest.trim_start().starts_with('=') {
                    return Some(offset + (line.len() - trimmed.len()));
                }
            }
        }
        offset += line.len();
    }
    None
}

/// Closest valid key to `unknown`, if any is similar enough.
pub fn closest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|k| (strsim::jaro_winkler(unknown, k), *k))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, k)| k.to_string())
}

/// Prints each error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["program", "marker", "quota", "results_file"];
        assert_eq!(closest_key("qouta", valid).as_deref(), Some("quota"));
        assert_eq!(closest_key("marekr", valid).as_deref(), Some("marker"));
        assert_eq!(closest_key("xyz", valid), None);
    }

    #[test]
    fn key_offset_respects_sections() {
        let text = "[logs]\nquota = 1\n[search]\n  quota = 5\n";
        let offset = key_offset(text, Some("search"), "quota").unwrap();
        assert_eq!(&text[offset..offset + 5], "quota");
        assert!(offset > text.find("[search]").unwrap());
        assert_eq!(key_offset(text, Some("query"), "quota"), None);
    }

    #[test]
    fn key_offset_ignores_prefix_matches() {
        let text = "[search]\nquota_extra = 1\nquota = 2\n";
        let offset = key_offset(text, Some("search"), "quota").unwrap();
        assert_eq!(&text[offset..], "quota = 2\n");
    }
}
