// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool registry and function handlers for the Parley support engine.
//!
//! The model may call five functions: `getProducts`, `submitContactForm`,
//! `submitQuoteRequest`, `searchKnowledgeBase` and `addRichContent`. Calls
//! are decoded into typed [`ToolCall`] variants and dispatched through the
//! [`ToolRegistry`], which bounds every result.

pub mod args;
pub mod builtin;
pub mod tool;

use std::sync::Arc;

use parley_config::{BudgetConfig, ToolsConfig};
use parley_core::ConversationStore;
use parley_retrieval::SourceSelector;

pub use args::ToolCall;
pub use tool::{Tool, ToolContext, ToolOutcome, ToolRegistry};

/// A registry holding every built-in tool.
pub fn default_registry(
    store: Arc<dyn ConversationStore>,
    selector: Arc<SourceSelector>,
    budget: &BudgetConfig,
    tools: &ToolsConfig,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new(budget.max_characters_in_function_response);
    builtin::register_builtins(&mut registry, store, selector, budget, tools);
    registry
}
