// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat engine for the Parley support engine.
//!
//! [`ChatEngine::generate_response`] turns a conversation snapshot and bot
//! settings into a reply:
//! 1. assemble the context (retrieval, history, system instruction)
//! 2. call the model with tools attached
//! 3. if it asked for functions, run them in order and replay the results
//! 4. call the model once more for the final text
//!
//! Nothing is kept between requests. Requests for different conversations
//! can run concurrently on the same engine.

pub mod state;

use std::sync::Arc;

use parley_config::ParleyConfig;
use parley_context::ContextEngine;
use parley_core::types::{
    Conversation, FunctionResponse, GenerateRequest, Part, RichContent, Role, ToolDeclaration,
    Turn,
};
use parley_core::{AppSettings, ConversationStore, Language, ModelProvider, ParleyError};
use parley_retrieval::SourceSelector;
use parley_tools::{ToolContext, ToolOutcome, ToolRegistry, default_registry};
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub use state::ProtocolState;

pub const FALLBACK_MESSAGE_EN: &str =
    "Sorry, something went wrong on our side. Please try again in a moment.";
pub const FALLBACK_MESSAGE_FR: &str =
    "Désolé, un problème est survenu de notre côté. Merci de réessayer dans un instant.";

/// Apology shown instead of an engine error, in the bot's language.
pub fn fallback_message(language: Language) -> &'static str {
    match language {
        Language::En => FALLBACK_MESSAGE_EN,
        Language::Fr => FALLBACK_MESSAGE_FR,
    }
}

/// The engine's answer to one visitor message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_content: Option<Vec<RichContent>>,
}

/// Drives context assembly and the tool-calling protocol.
pub struct ChatEngine {
    provider: Arc<dyn ModelProvider>,
    context: ContextEngine,
    registry: ToolRegistry,
}

impl ChatEngine {
    /// Wire an engine from configuration. The selector is shared between
    /// per-message retrieval and the `searchKnowledgeBase` tool, so they
    /// share one selection cache.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        store: Arc<dyn ConversationStore>,
        config: &ParleyConfig,
    ) -> Self {
        let selector = Arc::new(SourceSelector::new(
            provider.clone(),
            config.budget.max_knowledge_sources_per_message,
            &config.retrieval,
        ));
        let context = ContextEngine::new(
            provider.clone(),
            selector.clone(),
            config.budget,
            config.retrieval.clone(),
        );
        let registry = default_registry(store, selector, &config.budget, &config.tools);
        Self::from_parts(provider, context, registry)
    }

    pub fn from_parts(
        provider: Arc<dyn ModelProvider>,
        context: ContextEngine,
        registry: ToolRegistry,
    ) -> Self {
        Self {
            provider,
            context,
            registry,
        }
    }

    /// Produce a reply for the latest state of `conversation`.
    ///
    /// An empty model text at either round is a protocol error. Model calls
    /// are never retried here: after functions ran, a retry could repeat
    /// their side effects.
    pub async fn generate_response(
        &self,
        conversation: &Conversation,
        settings: &AppSettings,
    ) -> Result<ChatReply, ParleyError> {
        let assembled = self.context.assemble(conversation, settings).await;
        let tools = self
            .registry
            .declarations(settings.behavior.rich_content_enabled);
        let mut contents = assembled.turns;

        let mut state = ProtocolState::Initial;
        info!(
            conversation_id = %conversation.id,
            %state,
            turns = contents.len(),
            tools = tools.len(),
            knowledge = assembled.knowledge_source_ids.len(),
            "calling model"
        );
        let first = self
            .provider
            .generate(request(
                contents.clone(),
                &assembled.system_instruction,
                &tools,
            ))
            .await?;

        if first.function_calls.is_empty() {
            let text = first
                .non_empty_text()
                .ok_or(ParleyError::EmptyResponse { round: 1 })?;
            state = ProtocolState::Done;
            info!(conversation_id = %conversation.id, %state, "reply ready without tools");
            return Ok(ChatReply {
                text: text.to_string(),
                rich_content: None,
            });
        }

        state = ProtocolState::Dispatching;
        info!(
            conversation_id = %conversation.id,
            %state,
            calls = first.function_calls.len(),
            "model requested functions"
        );
        let tool_ctx = ToolContext {
            conversation_id: &conversation.id,
            bot_id: &conversation.bot_id,
            visitor_id: &conversation.visitor_id,
            ephemeral: conversation.ephemeral,
            settings,
        };
        let mut responses = Vec::with_capacity(first.function_calls.len());
        let mut rich_content = Vec::new();
        for call in &first.function_calls {
            let outcome = self.registry.dispatch(call, &tool_ctx).await;
            responses.push(Part::FunctionResponse(FunctionResponse {
                name: call.name.clone(),
                response: outcome.response_payload(),
            }));
            if let ToolOutcome::RichContent(card) = outcome {
                rich_content.push(card);
            }
        }

        for call in first.function_calls {
            contents.push(Turn {
                role: Role::Model,
                parts: vec![Part::FunctionCall(call)],
            });
        }
        contents.push(Turn {
            role: Role::User,
            parts: responses,
        });

        state = ProtocolState::Finalizing;
        info!(conversation_id = %conversation.id, %state, turns = contents.len(), "calling model");
        let second = self
            .provider
            .generate(request(contents, &assembled.system_instruction, &tools))
            .await?;
        if !second.function_calls.is_empty() {
            debug!(
                ignored = second.function_calls.len(),
                "function calls in the final round are not executed"
            );
        }

        let text = match second.non_empty_text() {
            Some(text) => text.to_string(),
            None if !rich_content.is_empty() => {
                return Err(ParleyError::EmptyResponseAfterTools {
                    rich_content: rich_content.len(),
                });
            }
            None => return Err(ParleyError::EmptyResponse { round: 2 }),
        };

        state = ProtocolState::Done;
        info!(
            conversation_id = %conversation.id,
            %state,
            rich_content = rich_content.len(),
            "reply ready"
        );
        Ok(ChatReply {
            text,
            rich_content: (!rich_content.is_empty()).then_some(rich_content),
        })
    }

    /// Like [`Self::generate_response`], but any error becomes the localized
    /// apology. The error itself is only logged.
    pub async fn respond_or_fallback(
        &self,
        conversation: &Conversation,
        settings: &AppSettings,
    ) -> ChatReply {
        match self.generate_response(conversation, settings).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_protocol_error() {
                    warn!(conversation_id = %conversation.id, error = %e, "protocol error, sending fallback");
                } else {
                    error!(conversation_id = %conversation.id, error = %e, "engine error, sending fallback");
                }
                ChatReply {
                    text: fallback_message(settings.behavior.language).to_string(),
                    rich_content: None,
                }
            }
        }
    }
}

fn request(contents: Vec<Turn>, system_instruction: &str, tools: &[ToolDeclaration]) -> GenerateRequest {
    GenerateRequest {
        contents,
        system_instruction: Some(system_instruction.to_string()),
        tools: tools.to_vec(),
        response_schema: None,
    }
}
