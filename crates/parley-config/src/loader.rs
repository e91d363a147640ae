// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/parley/parley.toml`
//! 3. `~/.config/parley/parley.toml`
//! 4. `./parley.toml`
//! 5. `PARLEY_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ParleyConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/parley/parley.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "parley.toml";

/// Sections that `PARLEY_<SECTION>_<KEY>` variables can address.
const ENV_SECTIONS: &[&str] = &["engine", "budget", "retrieval", "tools", "gemini", "storage"];

/// `~/.config/parley/parley.toml`, when a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("parley").join("parley.toml"))
}

/// Load configuration from the full hierarchy.
pub fn load_config() -> Result<ParleyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the defaults. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The un-extracted Figment for the full hierarchy.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_PATH)).merge(env_provider())
}

/// `PARLEY_BUDGET_MAX_SCENARIOS` maps to `budget.max_scenarios`.
///
/// Figment hands the stripped key over in its original case, so it is
/// lowercased first. Only the first underscore after the section name becomes
/// a dot, since key names contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("PARLEY_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            map_env_key("budget_max_characters_per_qna_answer"),
            "budget.max_characters_per_qna_answer"
        );
        assert_eq!(map_env_key("gemini_api_key"), "gemini.api_key");
        assert_eq!(map_env_key("unrelated_key"), "unrelated_key");
    }

    #[test]
    fn uppercase_env_vars_reach_their_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PARLEY_BUDGET_MAX_QNA_PAIRS", "7");
            jail.set_env("PARLEY_RETRIEVAL_GATE_ENABLED", "false");
            jail.set_env("PARLEY_ENGINE_LOG_LEVEL", "debug");
            jail.create_file("parley.toml", "")?;
            let config = load_config_from_path(Path::new("parley.toml"))?;
            assert_eq!(config.budget.max_qna_pairs, 7);
            assert!(!config.retrieval.gate_enabled);
            assert_eq!(config.engine.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("parley.toml", "[gemini]\nmodel = \"from-file\"\n")?;
            jail.set_env("PARLEY_GEMINI_MODEL", "from-env");
            jail.set_env("PARLEY_BUDGET_MAX_SCENARIOS", "3");
            let config = load_config_from_path(Path::new("parley.toml"))?;
            assert_eq!(config.gemini.model, "from-env");
            assert_eq!(config.budget.max_scenarios, 3);
            Ok(())
        });
    }
}
