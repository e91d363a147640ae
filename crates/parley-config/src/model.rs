// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley support engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Process-level engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Size and count limits applied to every request.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Retrieval gate and source selector settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Function handler settings.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process-level engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Request budgets.
///
/// These exist to bound request cost and latency. Every limit is a count of
/// messages/items or a count of characters (Unicode scalar values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Real messages kept in the history window (newest kept).
    #[serde(default = "default_max_messages_in_history")]
    pub max_messages_in_history: usize,

    /// Knowledge sources spliced into a single user turn.
    #[serde(default = "default_max_knowledge_sources_per_message")]
    pub max_knowledge_sources_per_message: usize,

    /// Characters of text content per knowledge source.
    #[serde(default = "default_max_characters_per_knowledge_source")]
    pub max_characters_per_knowledge_source: usize,

    /// Scenario pairs injected before history.
    #[serde(default = "default_max_scenarios")]
    pub max_scenarios: usize,

    /// Q&A pairs listed in the system instruction.
    #[serde(default = "default_max_qna_pairs")]
    pub max_qna_pairs: usize,

    /// Characters per Q&A answer.
    #[serde(default = "default_max_characters_per_qna_answer")]
    pub max_characters_per_qna_answer: usize,

    /// Characters of the admin's custom instruction.
    #[serde(default = "default_max_characters_in_custom_instruction")]
    pub max_characters_in_custom_instruction: usize,

    /// Characters of a serialized function result.
    #[serde(default = "default_max_characters_in_function_response")]
    pub max_characters_in_function_response: usize,

    /// Characters of the whole serialized request (turns + system instruction).
    #[serde(default = "default_max_total_context_characters")]
    pub max_total_context_characters: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_messages_in_history: default_max_messages_in_history(),
            max_knowledge_sources_per_message: default_max_knowledge_sources_per_message(),
            max_characters_per_knowledge_source: default_max_characters_per_knowledge_source(),
            max_scenarios: default_max_scenarios(),
            max_qna_pairs: default_max_qna_pairs(),
            max_characters_per_qna_answer: default_max_characters_per_qna_answer(),
            max_characters_in_custom_instruction: default_max_characters_in_custom_instruction(),
            max_characters_in_function_response: default_max_characters_in_function_response(),
            max_total_context_characters: default_max_total_context_characters(),
        }
    }
}

fn default_max_messages_in_history() -> usize {
    10
}

fn default_max_knowledge_sources_per_message() -> usize {
    2
}

fn default_max_characters_per_knowledge_source() -> usize {
    2000
}

fn default_max_scenarios() -> usize {
    5
}

fn default_max_qna_pairs() -> usize {
    20
}

fn default_max_characters_per_qna_answer() -> usize {
    500
}

fn default_max_characters_in_custom_instruction() -> usize {
    2000
}

fn default_max_characters_in_function_response() -> usize {
    5000
}

fn default_max_total_context_characters() -> usize {
    100_000
}

/// Retrieval gate and source selector configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Ask the gate before retrieving. When false, every question retrieves.
    #[serde(default = "default_gate_enabled")]
    pub gate_enabled: bool,

    /// Non-system history turns shown to the retrieval gate.
    #[serde(default = "default_gate_history_turns")]
    pub gate_history_turns: usize,

    /// Characters of content previewed per source when selecting.
    #[serde(default = "default_preview_characters")]
    pub preview_characters: usize,

    /// Characters of a source's rendered structured data.
    #[serde(default = "default_max_additional_data_characters")]
    pub max_additional_data_characters: usize,

    /// Maximum cached selections. Zero disables the cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Seconds a cached selection stays valid.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            gate_enabled: default_gate_enabled(),
            gate_history_turns: default_gate_history_turns(),
            preview_characters: default_preview_characters(),
            max_additional_data_characters: default_max_additional_data_characters(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_gate_enabled() -> bool {
    true
}

fn default_gate_history_turns() -> usize {
    4
}

fn default_preview_characters() -> usize {
    300
}

fn default_max_additional_data_characters() -> usize {
    1000
}

fn default_cache_capacity() -> usize {
    256
}

fn default_cache_ttl_secs() -> u64 {
    300
}

/// Function handler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Results returned by `searchKnowledgeBase` when the model omits `maxResults`.
    #[serde(default = "default_search_results")]
    pub default_search_results: usize,

    /// Upper clamp for `maxResults`.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Results kept when a search response overflows its budget.
    #[serde(default = "default_overflow_result_cap")]
    pub overflow_result_cap: usize,

    /// Characters per result content when a search response overflows its budget.
    #[serde(default = "default_overflow_snippet_characters")]
    pub overflow_snippet_characters: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_search_results: default_search_results(),
            max_search_results: default_max_search_results(),
            overflow_result_cap: default_overflow_result_cap(),
            overflow_snippet_characters: default_overflow_snippet_characters(),
        }
    }
}

fn default_search_results() -> usize {
    5
}

fn default_max_search_results() -> usize {
    10
}

fn default_overflow_result_cap() -> usize {
    5
}

fn default_overflow_snippet_characters() -> usize {
    500
}

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` requires the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every call.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-call deadline in seconds.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on 429/503 responses. Timeouts are never retried.
    #[serde(default = "default_gemini_max_retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
            max_retries: default_gemini_max_retries(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    60
}

fn default_gemini_max_retries() -> u32 {
    1
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parley").join("parley.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("parley.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
