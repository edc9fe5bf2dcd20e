// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{PromptProfileConfig, QuillConfig};

/// Validates a deserialized configuration.
///
/// Every problem is collected; validation does not stop at the first one.
pub fn validate_config(config: &QuillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.logs.directory.trim().is_empty() {
        errors.push(ConfigError::validation("logs.directory must not be empty"));
    }
    if config.logs.flush_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "logs.flush_interval_secs must be at least 1",
        ));
    }
    if config.query.result_limit == 0 {
        errors.push(ConfigError::validation("query.result_limit must be at least 1"));
    }

    let search = &config.search;
    if search.program.trim().is_empty() {
        errors.push(ConfigError::validation("search.program must not be empty"));
    }
    if search.marker.is_empty() {
        errors.push(ConfigError::validation("search.marker must not be empty"));
    }
    if search.quota == 0 {
        errors.push(ConfigError::validation("search.quota must be at least 1"));
    }
    if search.results_file.trim().is_empty() {
        errors.push(ConfigError::validation("search.results_file must not be empty"));
    }

    let mut seen = HashSet::new();
    for (i, entry) in config.commands.prefixes.iter().enumerate() {
        if entry.prefix.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "commands.prefixes[{i}] ({}) has an empty prefix",
                entry.command
            )));
        } else if !seen.insert(entry.prefix.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate command prefix `{}` in commands.prefixes",
                entry.prefix
            )));
        }
    }

    check_temperature("summary.temperature", config.summary.temperature, &mut errors);
    check_profile("prompt.ask", &config.prompt.ask, &mut errors);
    check_profile("prompt.chat", &config.prompt.chat, &mut errors);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_profile(name: &str, profile: &PromptProfileConfig, errors: &mut Vec<ConfigError>) {
    check_temperature(&format!("{name}.temperature"), profile.temperature, errors);
    if profile.tokens == 0 {
        errors.push(ConfigError::validation(format!(
            "{name}.tokens must be at least 1"
        )));
    }
}

fn check_temperature(key: &str, value: f32, errors: &mut Vec<ConfigError>) {
    if !(0.0..=2.0).contains(&value) {
        errors.push(ConfigError::validation(format!(
            "{key} must be between 0.0 and 2.0, got {value}"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&QuillConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = QuillConfig::default();
        config.search.quota = 0;
        config.logs.flush_interval_secs = 0;
        config.summary.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_duplicate_prefix() {
        let mut config = QuillConfig::default();
        let first = config.commands.prefixes[0].clone();
        config.commands.prefixes.push(first);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("duplicate command prefix `!q`"));
    }
}
