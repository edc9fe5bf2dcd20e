// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later overrides earlier:
//! 1. Compiled defaults
//! 2. `/etc/quill/quill.toml`
//! 3. `~/.config/quill/quill.toml`
//! 4. `./quill.toml`
//! 5. `QUILL_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuillConfig;

/// Config sections addressable through `QUILL_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "agent", "telegram", "logs", "query", "search", "summary", "prompt", "content",
];

/// Candidate config files, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/quill/quill.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("quill/quill.toml"));
    }
    paths.push(PathBuf::from("quill.toml"));
    paths
}

/// Builds the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(QuillConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard file hierarchy plus environment.
pub fn load_config() -> Result<QuillConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from a TOML string over the compiled defaults.
///
/// No files and no environment variables are consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<QuillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuillConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads configuration from one explicit file plus environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuillConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps `QUILL_SEARCH_RESULTS_FILE` to `search.results_file`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("QUILL_").map(|key| {
        let key_str = key.as_str();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("QUILL_SEARCH_RESULTS_FILE", "out.txt");
            jail.set_env("QUILL_TELEGRAM_BOT_TOKEN", "123:abc");
            jail.set_env("QUILL_LOGS_FLUSH_INTERVAL_SECS", "30");

            let config: QuillConfig = Figment::new()
                .merge(Serialized::defaults(QuillConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.search.results_file, "out.txt");
            assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
            assert_eq!(config.logs.flush_interval_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("quill.toml", "[search]\nquota = 42\n")?;
            let config = load_config()?;
            assert_eq!(config.search.quota, 42);
            assert_eq!(config.logs.directory, "./logs");
            Ok(())
        });
    }
}
