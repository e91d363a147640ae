// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley ask`: one visitor message in, one JSON reply out.

use std::path::Path;

use parley_config::ParleyConfig;
use parley_core::types::Conversation;
use parley_core::{Message, ParleyError, Sender};

use crate::settings::load_settings;

/// Runs a single simulated exchange. Nothing is stored.
pub async fn run_ask(
    config: &ParleyConfig,
    settings_path: &Path,
    bot_id: &str,
    message: &str,
) -> Result<(), ParleyError> {
    let settings = load_settings(settings_path)?;
    let (engine, _store) = crate::build_engine(config, false).await?;

    let mut conversation = Conversation::simulation(bot_id);
    conversation.push(Message::new(Sender::User, message));

    let reply = engine.respond_or_fallback(&conversation, &settings).await;
    let json = serde_json::to_string_pretty(&reply)
        .map_err(|e| ParleyError::Internal(format!("failed to encode reply: {e}")))?;
    println!("{json}");
    Ok(())
}
