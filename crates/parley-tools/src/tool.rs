// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, outcomes, and the name-keyed registry.
//!
//! The registry never fails a round: unknown functions, bad arguments and
//! handler errors all become `{success: false, error}` results for that one
//! call, and every result is bounded before it reaches the model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parley_context::truncate;
use parley_core::types::{FunctionCall, RichContent, ToolDeclaration};
use parley_core::{AppSettings, ParleyError};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::args::{ADD_RICH_CONTENT, DecodeError, ToolCall};

/// Room reserved for the `{"error":"truncated","data":""}` wrapper.
const TRUNCATION_ENVELOPE: usize = 64;

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// A JSON result forwarded to the model.
    Result(Value),
    /// A validated card for the caller. The model only sees an acknowledgement.
    RichContent(RichContent),
}

impl ToolOutcome {
    /// `{success: false, error}`.
    pub fn failure(error: impl Into<String>) -> Self {
        ToolOutcome::Result(json!({ "success": false, "error": error.into() }))
    }

    /// The payload sent back to the model for this outcome.
    pub fn response_payload(&self) -> Value {
        match self {
            ToolOutcome::Result(value) => value.clone(),
            ToolOutcome::RichContent(_) => json!({
                "success": true,
                "message": "Rich content added to the reply."
            }),
        }
    }
}

/// Request-scoped data a handler may need.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub conversation_id: &'a str,
    pub bot_id: &'a str,
    pub visitor_id: &'a str,
    /// Ephemeral conversations must never be written to the store.
    pub ephemeral: bool,
    pub settings: &'a AppSettings,
}

/// A function the model can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    /// Handle a decoded call. Validation failures are `Ok` failure outcomes;
    /// `Err` is reserved for faults the model cannot fix.
    async fn invoke(&self, call: ToolCall, ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError>;
}

/// Error for a handler handed another tool's arguments.
pub(crate) fn mismatched(tool: &str, call: &ToolCall) -> ParleyError {
    ParleyError::Tool {
        message: format!("{tool} received arguments for {}", call.name()),
    }
}

/// Registry mapping tool names to handlers.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    max_response_characters: usize,
}

impl ToolRegistry {
    pub fn new(max_response_characters: usize) -> Self {
        Self {
            tools: HashMap::new(),
            max_response_characters,
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for the model, sorted by name. `addRichContent` is only
    /// offered when the bot has rich content enabled.
    pub fn declarations(&self, rich_content_enabled: bool) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .filter(|t| rich_content_enabled || t.name() != ADD_RICH_CONTENT)
            .map(|t| ToolDeclaration {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    /// Run one function call. Never fails.
    pub async fn dispatch(&self, call: &FunctionCall, ctx: &ToolContext<'_>) -> ToolOutcome {
        let offered = ctx.settings.behavior.rich_content_enabled || call.name != ADD_RICH_CONTENT;
        let tool = match self.tools.get(&call.name) {
            Some(tool) if offered => tool,
            _ => {
                warn!(function = %call.name, "model called an unknown function");
                return ToolOutcome::failure(format!("Unknown function: {}", call.name));
            }
        };

        let decoded = match ToolCall::decode(&call.name, call.args.clone()) {
            Ok(decoded) => decoded,
            Err(DecodeError::UnknownFunction(name)) => {
                return ToolOutcome::failure(format!("Unknown function: {name}"));
            }
            Err(DecodeError::InvalidArguments { name, reason }) => {
                warn!(function = %name, %reason, "invalid function arguments");
                return ToolOutcome::failure(format!("Invalid arguments for {name}: {reason}"));
            }
        };

        info!(
            function = %call.name,
            conversation_id = ctx.conversation_id,
            writes = decoded.is_write(),
            "dispatching function call"
        );
        match tool.invoke(decoded, ctx).await {
            Ok(outcome) => self.bound(&call.name, outcome),
            Err(e) => {
                warn!(function = %call.name, error = %e, "function handler failed");
                ToolOutcome::failure(e.to_string())
            }
        }
    }

    /// Replace an oversized result with `{error: "truncated", data}`.
    fn bound(&self, name: &str, outcome: ToolOutcome) -> ToolOutcome {
        let ToolOutcome::Result(value) = outcome else {
            return outcome;
        };
        let serialized = value.to_string();
        let size = serialized.chars().count();
        if size <= self.max_response_characters {
            return ToolOutcome::Result(value);
        }
        debug!(function = name, size, limit = self.max_response_characters, "truncating function result");
        let mut data_budget = self
            .max_response_characters
            .saturating_sub(TRUNCATION_ENVELOPE);
        loop {
            let wrapped = json!({
                "error": "truncated",
                "data": truncate(&serialized, data_budget),
            });
            // Escaping inside `data` can push the wrapper past the limit.
            let wrapped_size = wrapped.to_string().chars().count();
            if wrapped_size <= self.max_response_characters || data_budget == 0 {
                return ToolOutcome::Result(wrapped);
            }
            data_budget = data_budget.saturating_sub(wrapped_size - self.max_response_characters);
        }
    }
}
