// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - a customer-support chatbot engine.
//!
//! Binary entry point: an interactive chat REPL, a one-shot `ask`, and a
//! configuration check.

mod ask;
mod chat;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use parley_config::ParleyConfig;
use parley_core::{HealthStatus, ParleyError, PluginAdapter};
use parley_engine::ChatEngine;
use parley_gemini::GeminiProvider;
use parley_storage::SqliteStore;
use tracing::{info, warn};

/// Parley - a customer-support chatbot engine.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with a bot interactively.
    Chat {
        /// Bot settings as JSON.
        #[arg(long)]
        settings: PathBuf,
        /// Store the conversation instead of running a simulation.
        #[arg(long)]
        persist: bool,
        /// Bot id recorded on the conversation.
        #[arg(long, default_value = "cli-bot")]
        bot_id: String,
    },
    /// Answer a single visitor message and print the reply as JSON.
    Ask {
        /// Bot settings as JSON.
        #[arg(long)]
        settings: PathBuf,
        #[arg(long, default_value = "cli-bot")]
        bot_id: String,
        /// The visitor's message.
        message: String,
    },
    /// Validate configuration and print the effective values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => parley_config::load_and_validate_path(path),
        None => parley_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.engine.log_level);

    let result = match cli.command {
        Commands::Chat {
            settings,
            persist,
            bot_id,
        } => chat::run_chat(&config, &settings, &bot_id, persist).await,
        Commands::Ask {
            settings,
            bot_id,
            message,
        } => ask::run_ask(&config, &settings, &bot_id, &message).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("parley: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(config: &ParleyConfig) -> Result<(), ParleyError> {
    let mut printable = config.clone();
    if printable.gemini.api_key.is_some() {
        printable.gemini.api_key = Some("<redacted>".to_string());
    }
    let rendered = toml::to_string_pretty(&printable)
        .map_err(|e| ParleyError::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Wire the Gemini provider and the SQLite store into an engine.
///
/// The store is only opened when `persist` is set. Simulated conversations
/// never reach it.
pub(crate) async fn build_engine(
    config: &ParleyConfig,
    persist: bool,
) -> Result<(ChatEngine, Arc<SqliteStore>), ParleyError> {
    let provider = Arc::new(GeminiProvider::new(&config.gemini).inspect_err(|_| {
        eprintln!(
            "error: Gemini API key required. Set gemini.api_key in parley.toml or the {} env var",
            parley_gemini::API_KEY_ENV
        );
    })?);

    check_adapter(provider.as_ref()).await?;

    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    if persist {
        parley_core::ConversationStore::initialize(store.as_ref()).await?;
        check_adapter(store.as_ref()).await?;
    }

    let engine = ChatEngine::new(provider, store.clone(), config);
    Ok((engine, store))
}

/// Run an adapter's health check and log its identity and status.
async fn check_adapter(adapter: &dyn PluginAdapter) -> Result<HealthStatus, ParleyError> {
    let status = adapter.health_check().await?;
    match &status {
        HealthStatus::Healthy => info!(
            adapter = adapter.name(),
            version = %adapter.version(),
            kind = ?adapter.adapter_type(),
            "adapter ready"
        ),
        other => warn!(
            adapter = adapter.name(),
            version = %adapter.version(),
            status = ?other,
            "adapter not healthy"
        ),
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_with_persist() {
        let cli = Cli::try_parse_from([
            "parley", "chat", "--settings", "bot.json", "--persist",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                settings,
                persist,
                bot_id,
            } => {
                assert_eq!(settings, PathBuf::from("bot.json"));
                assert!(persist);
                assert_eq!(bot_id, "cli-bot");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["parley", "ask", "--settings", "bot.json"]).is_err());
        let cli = Cli::try_parse_from([
            "parley", "--config", "p.toml", "ask", "--settings", "bot.json", "hello",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Commands::Ask { message, .. } if message == "hello"));
    }

    #[tokio::test]
    async fn initialized_store_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ParleyConfig::default();
        config.storage.database_path = dir.path().join("parley.db").to_str().unwrap().to_string();
        let store = SqliteStore::new(config.storage.clone());

        assert!(check_adapter(&store).await.is_err());

        parley_core::ConversationStore::initialize(&store).await.unwrap();
        assert_eq!(check_adapter(&store).await.unwrap(), HealthStatus::Healthy);
    }

    #[test]
    fn config_renders_with_redacted_key() {
        let mut config = ParleyConfig::default();
        config.gemini.api_key = Some("secret".to_string());
        assert!(print_config(&config).is_ok());
    }
}
