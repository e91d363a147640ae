// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        fail(format!(
            "engine.log_level `{}` must be one of: {}",
            config.engine.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let budget = &config.budget;
    for (name, value) in [
        ("max_messages_in_history", budget.max_messages_in_history),
        (
            "max_knowledge_sources_per_message",
            budget.max_knowledge_sources_per_message,
        ),
        (
            "max_characters_per_knowledge_source",
            budget.max_characters_per_knowledge_source,
        ),
        (
            "max_characters_in_function_response",
            budget.max_characters_in_function_response,
        ),
        (
            "max_total_context_characters",
            budget.max_total_context_characters,
        ),
    ] {
        if value == 0 {
            fail(format!("budget.{name} must be greater than zero"));
        }
    }

    if config.retrieval.preview_characters == 0 {
        fail("retrieval.preview_characters must be greater than zero".to_string());
    }

    let tools = &config.tools;
    if tools.max_search_results == 0 {
        fail("tools.max_search_results must be greater than zero".to_string());
    }
    if tools.default_search_results == 0 || tools.default_search_results > tools.max_search_results
    {
        fail(format!(
            "tools.default_search_results must be between 1 and tools.max_search_results ({}), got {}",
            tools.max_search_results, tools.default_search_results
        ));
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }
    if !config.gemini.base_url.starts_with("http://")
        && !config.gemini.base_url.starts_with("https://")
    {
        fail(format!(
            "gemini.base_url `{}` must start with http:// or https://",
            config.gemini.base_url
        ));
    }
    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be greater than zero".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
