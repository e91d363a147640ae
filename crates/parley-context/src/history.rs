// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scenario turns and the bounded history window.

use parley_core::settings::Scenario;
use parley_core::types::{Message, Sender, Turn};

/// The first `max` usable scenarios as (user, model) turn pairs.
///
/// Scenarios with a blank side are skipped and do not count toward `max`.
pub fn scenario_turns(scenarios: &[Scenario], max: usize) -> Vec<Turn> {
    scenarios
        .iter()
        .filter(|s| !s.user_message.trim().is_empty() && !s.bot_response.trim().is_empty())
        .take(max)
        .flat_map(|s| [Turn::user(&s.user_message), Turn::model(&s.bot_response)])
        .collect()
}

/// The newest `max` messages that may be shown to the model, oldest first.
///
/// System messages and in-flight (streaming, still empty) bot/agent
/// messages never qualify.
pub fn history_window(messages: &[Message], max: usize) -> Vec<&Message> {
    let eligible: Vec<&Message> = messages
        .iter()
        .filter(|m| m.is_context_eligible() && !m.is_in_flight())
        .collect();
    let start = eligible.len().saturating_sub(max);
    eligible[start..].to_vec()
}

/// A message as a model turn. Bot and agent messages are both the model side.
pub fn message_turn(message: &Message, text: &str) -> Turn {
    match message.sender {
        Sender::User => Turn::user(text),
        _ => Turn::model(text),
    }
}
