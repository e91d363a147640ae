// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley chat`: interactive REPL against one bot.
//!
//! Runs as a simulation unless `--persist` is given, in which case a stored
//! conversation is started and every turn and submission is saved.

use std::path::Path;

use colored::Colorize;
use parley_config::ParleyConfig;
use parley_core::types::{Conversation, RichContent};
use parley_core::{ConversationStore, Message, ParleyError, Sender};
use parley_engine::ChatReply;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::settings::load_settings;

/// Visitor id used for conversations started from the terminal.
const CLI_VISITOR_ID: &str = "cli-visitor";

pub async fn run_chat(
    config: &ParleyConfig,
    settings_path: &Path,
    bot_id: &str,
    persist: bool,
) -> Result<(), ParleyError> {
    let settings = load_settings(settings_path)?;
    let (engine, store) = crate::build_engine(config, persist).await?;

    let mut conversation = if persist {
        store.start_conversation(bot_id, CLI_VISITOR_ID, None).await?
    } else {
        Conversation::simulation(bot_id)
    };
    info!(conversation_id = %conversation.id, persist, "chat started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Internal(format!("failed to initialize readline: {e}")))?;

    let brand = if settings.appearance.brand_name.is_empty() {
        "parley"
    } else {
        settings.appearance.brand_name.as_str()
    };
    println!("{}", format!("{brand} chat").bold().green());
    if !persist {
        println!("{}", "simulation: nothing will be saved".dimmed());
    }
    println!("Type {} to exit.\n", "/quit".yellow());

    let opening = settings
        .personality
        .opening_message
        .get(settings.behavior.language);
    if !opening.is_empty() {
        let greeting = Message::new(Sender::Bot, opening);
        println!("{} {}\n", format!("{brand}:").cyan(), greeting.text);
        record(store.as_ref(), &mut conversation, greeting).await;
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                record(store.as_ref(), &mut conversation, Message::new(Sender::User, trimmed)).await;
                let reply = engine.respond_or_fallback(&conversation, &settings).await;
                println!("{} {}", format!("{brand}:").cyan(), reply.text);
                print_rich_content(&reply);
                println!();
                record(store.as_ref(), &mut conversation, Message::new(Sender::Bot, reply.text)).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if persist {
        let submissions = store.list_submissions(&conversation.id).await?;
        if !submissions.is_empty() {
            println!(
                "{}",
                format!("{} submission(s) recorded", submissions.len()).dimmed()
            );
        }
        store.close().await?;
    }
    Ok(())
}

/// Append to the local snapshot and, for stored conversations, to the store.
/// A failed write is logged and the chat carries on.
async fn record(store: &dyn ConversationStore, conversation: &mut Conversation, message: Message) {
    if !conversation.ephemeral
        && let Err(e) = store.append_message(&conversation.id, &message).await
    {
        warn!(conversation_id = %conversation.id, error = %e, "failed to store message");
    }
    conversation.push(message);
}

fn print_rich_content(reply: &ChatReply) {
    for card in reply.rich_content.iter().flatten() {
        let line = match card {
            RichContent::PersonCard(p) => {
                let contact = p.email.as_deref().or(p.phone.as_deref()).unwrap_or("");
                format!("[person] {} {contact}", p.name)
            }
            RichContent::ProductCard(p) => format!("[product] {} <{}>", p.title, p.url),
        };
        println!("  {}", line.magenta());
    }
}
