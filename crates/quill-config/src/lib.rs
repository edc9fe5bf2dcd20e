// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Quill chat assistant.
//!
//! TOML files are layered with `QUILL_*` environment overrides through
//! Figment. Unknown keys are rejected and reported with miette diagnostics.
//!
//! ```no_run
//! let config = quill_config::load_and_validate().expect("config errors");
//! println!("logs in {}", config.logs.directory);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::QuillConfig;

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<QuillConfig, Vec<ConfigError>> {
    let config =
        loader::load_config().map_err(|e| diagnostic::from_figment(e, &read_sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Loads one explicit config file and validates it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<QuillConfig, Vec<ConfigError>> {
    let config = loader::load_config_from_path(path).map_err(|e| {
        let sources: Vec<_> = std::fs::read_to_string(path)
            .map(|text| vec![(path.display().to_string(), text)])
            .unwrap_or_default();
        diagnostic::from_figment(e, &sources)
    })?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Parses a TOML string over the defaults and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuillConfig, Vec<ConfigError>> {
    let config = loader::load_config_from_str(toml_content).map_err(|e| {
        diagnostic::from_figment(e, &[("quill.toml".to_string(), toml_content.to_string())])
    })?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Reads whichever config files exist, keyed the way Figment reports them.
fn read_sources() -> Vec<(String, String)> {
    loader::config_paths()
        .into_iter()
        .filter_map(|path| {
            let text = std::fs::read_to_string(&path).ok()?;
            let shown = std::fs::canonicalize(&path).unwrap_or(path);
            Some((shown.display().to_string(), text))
        })
        .collect()
}
