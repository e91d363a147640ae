// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-made settings, conversations and knowledge sources.

use parley_core::settings::{Appearance, Behavior, Personality, Scenario};
use parley_core::types::{Conversation, Message, Sender};
use parley_core::{AppSettings, KnowledgeSource, SourceKind};

/// `count` file sources with ids `src-0..`, names `doc-0.pdf..` and short content.
pub fn knowledge_sources(count: usize) -> Vec<KnowledgeSource> {
    (0..count)
        .map(|i| KnowledgeSource {
            id: format!("src-{i}"),
            kind: SourceKind::File,
            name: format!("doc-{i}.pdf"),
            content: format!("Content of document {i}."),
            additional_data: None,
        })
        .collect()
}

/// A Q&A pair stored as a knowledge source.
pub fn qna_pair(question: &str, answer: &str) -> KnowledgeSource {
    KnowledgeSource {
        id: format!("qna-{}", question.len()),
        kind: SourceKind::Qna,
        name: question.to_string(),
        content: answer.to_string(),
        additional_data: None,
    }
}

/// Minimal settings for a bot called "Acme".
pub fn settings() -> AppSettings {
    AppSettings {
        appearance: Appearance {
            brand_name: "Acme".to_string(),
            primary_color: None,
        },
        personality: Personality {
            custom_instruction: "Keep answers under three sentences.".to_string(),
            ..Personality::default()
        },
        behavior: Behavior::default(),
        knowledge_base: Vec::new(),
        qna: Vec::new(),
    }
}

/// Settings with `count` scenarios.
pub fn settings_with_scenarios(count: usize) -> AppSettings {
    let mut settings = settings();
    settings.personality.scenarios = (0..count)
        .map(|i| Scenario {
            user_message: format!("scenario question {i}"),
            bot_response: format!("scenario answer {i}"),
        })
        .collect();
    settings
}

/// A persisted (non-ephemeral) conversation with the given messages.
pub fn conversation(messages: Vec<Message>) -> Conversation {
    let mut conversation = Conversation::new("conv_fixture", "bot_acme", "visitor_1");
    conversation.messages = messages;
    conversation
}

/// A conversation holding one visitor message.
pub fn conversation_with_question(question: &str) -> Conversation {
    conversation(vec![Message::new(Sender::User, question)])
}

/// Alternating user/bot messages `m0`, `m1`, ... (`m0` from the user).
pub fn alternating_messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Bot };
            let mut message = Message::new(sender, format!("m{i}"));
            message.id = format!("msg-{i}");
            message
        })
        .collect()
}
