// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval gate: one small classification call per visitor message.

use std::sync::Arc;

use parley_config::RetrievalConfig;
use parley_core::types::{GenerateRequest, Message, Sender, Turn};
use parley_core::{KnowledgeSource, ModelProvider, ParleyError};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::json::parse_model_json;

/// Q&A questions listed in the gate prompt.
const MAX_QNA_TOPICS: usize = 20;

const GATE_INSTRUCTION: &str = "You decide whether a customer-support assistant must consult the \
company knowledge base before answering the visitor's latest message.

The knowledge base IS needed when the message:
- asks about products, services, or facts about the company
- requires specific data such as prices, specifications, policies, or documents

The knowledge base is NOT needed when the message:
- is a greeting, thanks, or small talk
- is already answered by one of the configured Q&A topics listed below
- can be handled from the conversation so far

Respond with JSON only.";

#[derive(Debug, Deserialize)]
struct GateVerdict {
    #[serde(rename = "needsKnowledgeBase")]
    needs_knowledge_base: bool,
    #[serde(default)]
    reason: String,
}

fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "needsKnowledgeBase": { "type": "BOOLEAN" },
            "reason": { "type": "STRING" }
        },
        "required": ["needsKnowledgeBase", "reason"]
    })
}

/// Decides whether the knowledge base is needed for a question.
pub struct RetrievalGate {
    provider: Arc<dyn ModelProvider>,
    history_turns: usize,
}

impl RetrievalGate {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &RetrievalConfig) -> Self {
        Self {
            provider,
            history_turns: config.gate_history_turns,
        }
    }

    /// Returns `true` when the knowledge base should be consulted.
    ///
    /// Any failure (provider error, empty or malformed response) counts as
    /// `true`: a wasted retrieval costs less than a missing answer.
    pub async fn needs_retrieval(
        &self,
        question: &str,
        recent_history: &[Message],
        qna: &[KnowledgeSource],
    ) -> bool {
        match self.classify(question, recent_history, qna).await {
            Ok(verdict) => {
                debug!(
                    needs_knowledge_base = verdict.needs_knowledge_base,
                    reason = %verdict.reason,
                    "retrieval gate verdict"
                );
                verdict.needs_knowledge_base
            }
            Err(e) => {
                warn!(error = %e, "retrieval gate failed, retrieving anyway");
                true
            }
        }
    }

    async fn classify(
        &self,
        question: &str,
        recent_history: &[Message],
        qna: &[KnowledgeSource],
    ) -> Result<GateVerdict, ParleyError> {
        let request = GenerateRequest {
            contents: vec![Turn::user(self.prompt(question, recent_history, qna))],
            system_instruction: Some(GATE_INSTRUCTION.to_string()),
            tools: Vec::new(),
            response_schema: Some(verdict_schema()),
        };
        let response = self.provider.generate(request).await?;
        let text = response.non_empty_text().ok_or_else(|| ParleyError::Provider {
            message: "retrieval gate returned no text".to_string(),
            source: None,
        })?;
        parse_model_json(text).map_err(|e| ParleyError::Provider {
            message: format!("retrieval gate returned malformed JSON: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn prompt(&self, question: &str, recent_history: &[Message], qna: &[KnowledgeSource]) -> String {
        let eligible: Vec<&Message> = recent_history
            .iter()
            .filter(|m| m.is_context_eligible() && !m.is_in_flight())
            .collect();
        let window = &eligible[eligible.len().saturating_sub(self.history_turns)..];

        let mut prompt = String::new();
        if !window.is_empty() {
            prompt.push_str("Recent conversation:\n");
            for message in window {
                let speaker = match message.sender {
                    Sender::User => "Visitor",
                    _ => "Assistant",
                };
                prompt.push_str(&format!("{speaker}: {}\n", message.text));
            }
            prompt.push('\n');
        }
        if !qna.is_empty() {
            prompt.push_str("Configured Q&A topics:\n");
            for pair in qna.iter().take(MAX_QNA_TOPICS) {
                prompt.push_str(&format!("- {}\n", pair.name));
            }
            prompt.push('\n');
        }
        prompt.push_str(&format!("Latest visitor message: {question}"));
        prompt
    }
}
