// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budgeted context assembly for the Parley support engine.
//!
//! Produces the turns and system instruction for one chat request:
//! - scenario pairs, then the newest history messages
//! - retrieved knowledge spliced into the latest visitor message only
//! - a system instruction built from bot settings
//!
//! Retrieval is the only model-dependent step. Everything after it is a pure
//! function of (conversation, settings, selected sources), so identical
//! inputs always produce identical output.

pub mod history;
pub mod knowledge;
pub mod system_instruction;
pub mod truncate;

use std::sync::Arc;

use parley_config::{BudgetConfig, RetrievalConfig};
use parley_core::types::{Conversation, Sender, Turn};
use parley_core::{AppSettings, KnowledgeSource, ModelProvider};
use parley_retrieval::{RetrievalGate, SourceSelector};
use tracing::{debug, info, warn};

pub use knowledge::KnowledgeLimits;
pub use system_instruction::build_system_instruction;
pub use truncate::{TRUNCATION_MARKER, truncate};

/// Below this per-source cap the valve drops knowledge instead of halving again.
const MIN_SOURCE_CHARACTERS: usize = 100;

/// Turns and system instruction ready for the first model call.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub turns: Vec<Turn>,
    pub system_instruction: String,
    /// Ids of the sources spliced into the latest visitor message.
    pub knowledge_source_ids: Vec<String>,
}

impl AssembledContext {
    /// Serialized size in characters: turns as JSON plus the system instruction.
    pub fn serialized_len(&self) -> usize {
        let turns = serde_json::to_string(&self.turns).unwrap_or_default();
        turns.chars().count() + self.system_instruction.chars().count()
    }
}

/// Runs retrieval, then builds the context within budget.
pub struct ContextEngine {
    budget: BudgetConfig,
    retrieval: RetrievalConfig,
    gate: RetrievalGate,
    selector: Arc<SourceSelector>,
}

impl ContextEngine {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        selector: Arc<SourceSelector>,
        budget: BudgetConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            gate: RetrievalGate::new(provider, &retrieval),
            budget,
            retrieval,
            selector,
        }
    }

    /// Retrieve knowledge for the latest visitor message, then build.
    pub async fn assemble(
        &self,
        conversation: &Conversation,
        settings: &AppSettings,
    ) -> AssembledContext {
        let selected = self.retrieve(conversation, settings).await;
        let refs: Vec<&KnowledgeSource> = selected.iter().collect();
        build_context(conversation, settings, &refs, &self.budget, &self.retrieval)
    }

    /// Sources to splice into the latest visitor message, in selection order.
    ///
    /// Gate and selector run strictly in sequence. Empty when the bot has no
    /// knowledge, no visitor message falls inside the history window, or the
    /// gate says no.
    pub async fn retrieve(
        &self,
        conversation: &Conversation,
        settings: &AppSettings,
    ) -> Vec<KnowledgeSource> {
        if !settings.has_knowledge() {
            return Vec::new();
        }
        // Only a visitor message inside the history window receives knowledge.
        let window =
            history::history_window(&conversation.messages, self.budget.max_messages_in_history);
        let Some(latest) = window
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .and_then(|m| conversation.messages.iter().position(|c| std::ptr::eq(c, *m)))
        else {
            debug!(conversation_id = %conversation.id, "no visitor message in history window");
            return Vec::new();
        };
        let question = &conversation.messages[latest].text;

        if self.retrieval.gate_enabled
            && !self
                .gate
                .needs_retrieval(question, &conversation.messages[..latest], &settings.qna)
                .await
        {
            debug!(conversation_id = %conversation.id, "retrieval skipped by gate");
            return Vec::new();
        }

        let ids = self
            .selector
            .select_sources(question, &settings.knowledge_base)
            .await;
        info!(conversation_id = %conversation.id, sources = ?ids, "knowledge retrieved");
        ids.iter()
            .filter_map(|id| settings.knowledge_base.iter().find(|s| &s.id == id))
            .cloned()
            .collect()
    }
}

/// Build the context from already-selected knowledge, enforcing the total
/// size budget by shrinking, then dropping, the knowledge content.
pub fn build_context(
    conversation: &Conversation,
    settings: &AppSettings,
    knowledge: &[&KnowledgeSource],
    budget: &BudgetConfig,
    retrieval: &RetrievalConfig,
) -> AssembledContext {
    let system_instruction = build_system_instruction(settings, budget);
    let mut limits = KnowledgeLimits::new(budget, retrieval);

    loop {
        let context = assemble_turns(conversation, settings, knowledge, budget, limits)
            .with_instruction(&system_instruction);
        let size = context.serialized_len();
        if size <= budget.max_total_context_characters || context.knowledge_source_ids.is_empty() {
            if size > budget.max_total_context_characters {
                warn!(size, limit = budget.max_total_context_characters, "context exceeds total budget without knowledge");
            }
            return context;
        }
        if limits.content_characters <= MIN_SOURCE_CHARACTERS {
            warn!(size, "context over budget, dropping retrieved knowledge");
            return assemble_turns(conversation, settings, &[], budget, limits)
                .with_instruction(&system_instruction);
        }
        limits = limits.halved();
        debug!(
            size,
            per_source = limits.content_characters,
            "context over budget, shrinking knowledge"
        );
    }
}

struct Turns {
    turns: Vec<Turn>,
    knowledge_source_ids: Vec<String>,
}

impl Turns {
    fn with_instruction(self, system_instruction: &str) -> AssembledContext {
        AssembledContext {
            turns: self.turns,
            system_instruction: system_instruction.to_string(),
            knowledge_source_ids: self.knowledge_source_ids,
        }
    }
}

fn assemble_turns(
    conversation: &Conversation,
    settings: &AppSettings,
    knowledge: &[&KnowledgeSource],
    budget: &BudgetConfig,
    limits: KnowledgeLimits,
) -> Turns {
    let mut turns = history::scenario_turns(&settings.personality.scenarios, budget.max_scenarios);

    let window = history::history_window(&conversation.messages, budget.max_messages_in_history);
    let latest_user = window.iter().rposition(|m| m.sender == Sender::User);
    let splice = !knowledge.is_empty() && latest_user.is_some();

    for (i, message) in window.iter().enumerate() {
        if splice && Some(i) == latest_user {
            let text = knowledge::augment_question(&message.text, knowledge, settings.has_qna(), limits);
            turns.push(history::message_turn(message, &text));
        } else {
            turns.push(history::message_turn(message, &message.text));
        }
    }

    Turns {
        turns,
        knowledge_source_ids: if splice {
            knowledge.iter().map(|s| s.id.clone()).collect()
        } else {
            Vec::new()
        },
    }
}
