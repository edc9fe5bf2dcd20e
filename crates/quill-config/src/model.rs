// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use quill_core::CommandKind;
use serde::{Deserialize, Serialize};

/// Top-level Quill configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    /// Assistant identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Conversation log storage.
    #[serde(default)]
    pub logs: LogsConfig,

    /// In-chat log query limits.
    #[serde(default)]
    pub query: QueryConfig,

    /// External index search producer.
    #[serde(default)]
    pub search: SearchConfig,

    /// Command prefix table.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Chat-completion endpoint used for summaries.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Prompt endpoint used by the ask/chat commands.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Content endpoint used by the fetch command.
    #[serde(default)]
    pub content: ContentConfig,
}

/// Assistant identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "quill".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Username of the bot account. Looked up with `getMe` when unset.
    #[serde(default)]
    pub bot_username: Option<String>,
}

/// Conversation log storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogsConfig {
    /// Directory holding one JSON file per conversation and day.
    #[serde(default = "default_logs_directory")]
    pub directory: String,

    /// Seconds between flushes of buffered records to disk.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            directory: default_logs_directory(),
            flush_interval_secs: default_flush_interval_secs(),
        }
    }
}

fn default_logs_directory() -> String {
    "./logs".to_string()
}

fn default_flush_interval_secs() -> u64 {
    300
}

/// Log query configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Maximum results returned by substring and fuzzy search.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Number of most recent messages included in a summary transcript.
    #[serde(default = "default_summary_window")]
    pub summary_window: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            summary_window: default_summary_window(),
        }
    }
}

fn default_result_limit() -> usize {
    10
}

fn default_summary_window() -> usize {
    200
}

/// External index search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Producer executable. The search term is appended as the last argument.
    #[serde(default = "default_search_program")]
    pub program: String,

    /// Arguments placed before the search term.
    #[serde(default)]
    pub args: Vec<String>,

    /// Anchor text locating the payload on each producer output line.
    #[serde(default = "default_search_marker")]
    pub marker: String,

    /// Maximum number of unique result lines collected per search.
    #[serde(default = "default_search_quota")]
    pub quota: usize,

    /// File the result lines are written to before being attached.
    #[serde(default = "default_results_file")]
    pub results_file: String,

    /// Wall-clock limit for one search. `0` waits for the producer forever.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: Option<u64>,

    /// Seconds to wait after a stop request before force-killing the producer.
    #[serde(default = "default_terminate_grace_secs")]
    pub terminate_grace_secs: u64,

    /// Sender ids refused access to the external search command.
    #[serde(default)]
    pub denied_senders: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: default_search_program(),
            args: Vec::new(),
            marker: default_search_marker(),
            quota: default_search_quota(),
            results_file: default_results_file(),
            timeout_secs: default_search_timeout_secs(),
            terminate_grace_secs: default_terminate_grace_secs(),
            denied_senders: Vec::new(),
        }
    }
}

fn default_search_program() -> String {
    "./zindex5".to_string()
}

fn default_search_marker() -> String {
    "preview\"".to_string()
}

fn default_search_quota() -> usize {
    500
}

fn default_results_file() -> String {
    "search_results.txt".to_string()
}

fn default_search_timeout_secs() -> Option<u64> {
    Some(600)
}

fn default_terminate_grace_secs() -> u64 {
    5
}

/// Command prefix table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    /// Ordered prefix table. The first prefix a message starts with wins.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<PrefixConfig>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
        }
    }
}

/// One entry of the prefix table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixConfig {
    pub command: CommandKind,
    pub prefix: String,
}

fn default_prefixes() -> Vec<PrefixConfig> {
    [
        (CommandKind::Ask, "!q"),
        (CommandKind::Chat, "!cb"),
        (CommandKind::Fetch, "!w"),
        (CommandKind::Arf, "!arf"),
        (CommandKind::Summarize, "!cai"),
        (CommandKind::Search, "!search"),
        (CommandKind::Stats, "!stats"),
        (CommandKind::FuzzySearch, "!fsearch"),
        (CommandKind::ExternalSearch, "/z"),
    ]
    .into_iter()
    .map(|(command, prefix)| PrefixConfig {
        command,
        prefix: prefix.to_string(),
    })
    .collect()
}

/// OpenAI-compatible chat-completion endpoint used for summaries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryConfig {
    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_summary_base_url")]
    pub base_url: String,

    /// Bearer token, if the endpoint requires one.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_summary_model")]
    pub model: String,

    #[serde(default = "default_summary_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_summary_temperature")]
    pub temperature: f32,

    /// System prompt placed before the transcript.
    #[serde(default = "default_summary_system_prompt")]
    pub system_prompt: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_summary_base_url(),
            api_key: None,
            model: default_summary_model(),
            max_tokens: default_summary_max_tokens(),
            temperature: default_summary_temperature(),
            system_prompt: default_summary_system_prompt(),
        }
    }
}

fn default_summary_base_url() -> String {
    "http://127.0.0.1:1234/v1".to_string()
}

fn default_summary_model() -> String {
    "local-model".to_string()
}

fn default_summary_max_tokens() -> u32 {
    800
}

fn default_summary_temperature() -> f32 {
    0.6
}

fn default_summary_system_prompt() -> String {
    "Write a detailed, fine-grained summary of the provided chat messages.".to_string()
}

/// Prompt endpoint configuration for the ask and chat commands.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Endpoint base URL; `/q` is appended. `None` disables ask and chat.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Text file sent as context with chat questions.
    #[serde(default)]
    pub context_path: Option<String>,

    #[serde(default = "default_ask_profile")]
    pub ask: PromptProfileConfig,

    #[serde(default = "default_chat_profile")]
    pub chat: PromptProfileConfig,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            context_path: None,
            ask: default_ask_profile(),
            chat: default_chat_profile(),
        }
    }
}

/// Generation parameters sent with one kind of prompt.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptProfileConfig {
    pub temperature: f32,
    pub tokens: u32,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_prompt_version")]
    pub version: String,
}

fn default_prompt_version() -> String {
    "v2".to_string()
}

fn default_ask_profile() -> PromptProfileConfig {
    PromptProfileConfig {
        temperature: 0.3,
        tokens: 3000,
        model: None,
        format: None,
        version: default_prompt_version(),
    }
}

fn default_chat_profile() -> PromptProfileConfig {
    PromptProfileConfig {
        temperature: 0.92,
        tokens: 4000,
        model: None,
        format: Some("fun".to_string()),
        version: default_prompt_version(),
    }
}

/// Content endpoint configuration for the fetch command.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Full endpoint URL. `None` disables fetch.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sent as the `X-API-KEY` header.
    #[serde(default)]
    pub api_key: Option<String>,
}
