// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Parley support engine.
//!
//! TOML parsing with `deny_unknown_fields`, XDG file lookup, `PARLEY_*`
//! environment overrides, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use parley_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("history window: {}", config.budget.max_messages_in_history);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    BudgetConfig, EngineConfig, GeminiConfig, ParleyConfig, RetrievalConfig, StorageConfig,
    ToolsConfig,
};

/// Load from the full hierarchy, then validate.
pub fn load_and_validate() -> Result<ParleyConfig, Vec<ConfigError>> {
    loader::load_config()
        .map_err(|err| diagnostic::figment_to_config_errors(err, &collect_toml_sources()))
        .and_then(validated)
}

/// Load from one explicit file (plus env overrides), then validate.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<ParleyConfig, Vec<ConfigError>> {
    loader::load_config_from_path(path)
        .map_err(|err| {
            let sources: Vec<(String, String)> = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            diagnostic::figment_to_config_errors(err, &sources)
        })
        .and_then(validated)
}

/// Load from a TOML string over the defaults, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<ParleyConfig, Vec<ConfigError>> {
    loader::load_config_from_str(toml_content)
        .map_err(|err| {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            diagnostic::figment_to_config_errors(err, &sources)
        })
        .and_then(validated)
}

fn validated(config: ParleyConfig) -> Result<ParleyConfig, Vec<ConfigError>> {
    validation::validate_config(&config)?;
    Ok(config)
}

/// Contents of every config file that exists, for error span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into());
    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
