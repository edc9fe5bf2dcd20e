// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use quill_config::diagnostic::ConfigError;
use quill_config::{load_and_validate_str, load_config_from_str};
use quill_core::CommandKind;

#[test]
fn full_config_deserializes() {
    let toml = r#"
[agent]
name = "quill-test"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
bot_username = "quill_bot"

[logs]
directory = "/var/lib/quill/logs"
flush_interval_secs = 60

[query]
result_limit = 5

[search]
program = "/opt/zindex5"
args = ["--json"]
quota = 100
timeout_secs = 30
denied_senders = ["66"]

[summary]
base_url = "http://llm.local/v1"
model = "mistral"

[prompt]
base_url = "http://prompt.local"
context_path = "context.txt"

[prompt.chat]
temperature = 1.0
tokens = 2000
format = "fun"

[content]
endpoint = "http://content.local/markdown"
api_key = "secret"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.agent.name, "quill-test");
    assert_eq!(config.telegram.bot_username.as_deref(), Some("quill_bot"));
    assert_eq!(config.logs.flush_interval_secs, 60);
    assert_eq!(config.query.result_limit, 5);
    assert_eq!(config.query.summary_window, 200);
    assert_eq!(config.search.args, vec!["--json"]);
    assert_eq!(config.search.timeout_secs, Some(30));
    assert_eq!(config.search.marker, "preview\"");
    assert_eq!(config.summary.model, "mistral");
    assert_eq!(config.summary.max_tokens, 800);
    assert_eq!(config.prompt.chat.tokens, 2000);
    assert_eq!(config.prompt.chat.version, "v2");
    assert_eq!(config.prompt.ask.tokens, 3000);
    assert_eq!(config.content.api_key.as_deref(), Some("secret"));
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.logs.directory, "./logs");
    assert_eq!(config.logs.flush_interval_secs, 300);
    assert_eq!(config.search.quota, 500);
    assert_eq!(config.search.results_file, "search_results.txt");
    assert!(config.telegram.bot_token.is_none());

    let prefixes: Vec<_> = config
        .commands
        .prefixes
        .iter()
        .map(|p| (p.command, p.prefix.as_str()))
        .collect();
    assert_eq!(prefixes.first(), Some(&(CommandKind::Ask, "!q")));
    assert_eq!(prefixes.last(), Some(&(CommandKind::ExternalSearch, "/z")));
    assert_eq!(prefixes.len(), 9);
}

#[test]
fn custom_prefix_table_replaces_defaults() {
    let toml = r#"
[[commands.prefixes]]
command = "external_search"
prefix = "!z"

[[commands.prefixes]]
command = "stats"
prefix = "!st"
"#;
    let config = load_and_validate_str(toml).expect("valid prefixes");
    assert_eq!(config.commands.prefixes.len(), 2);
    assert_eq!(config.commands.prefixes[0].command, CommandKind::ExternalSearch);
}

#[test]
fn unknown_command_kind_is_rejected() {
    let toml = r#"
[[commands.prefixes]]
command = "dance"
prefix = "!d"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn typo_produces_suggestion_and_span() {
    let toml = "[search]\nqouta = 5\n";
    let errors = load_and_validate_str(toml).expect_err("typo must fail");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "qouta");
            assert_eq!(suggestion.as_deref(), Some("quota"));
            let span = span.expect("span located");
            assert_eq!(span.offset(), toml.find("qouta").unwrap());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[search]\nquota = \"many\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn validation_errors_surface_after_parse() {
    let toml = "[search]\nquota = 0\nprogram = \"\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn config_file_and_env_layer() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[query]\nresult_limit = 3\n")?;
        jail.set_env("QUILL_QUERY_RESULT_LIMIT", "7");
        jail.set_env("QUILL_AGENT_LOG_LEVEL", "trace");
        let config = quill_config::load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.query.result_limit, 7);
        assert_eq!(config.agent.log_level, "trace");
        Ok(())
    });
}
