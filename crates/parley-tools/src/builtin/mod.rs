// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in function handlers.

pub mod forms;
pub mod products;
pub mod rich_content;
pub mod search;

pub use forms::{ContactFormTool, QuoteRequestTool};
pub use products::GetProductsTool;
pub use rich_content::AddRichContentTool;
pub use search::SearchKnowledgeBaseTool;

use std::sync::Arc;

use parley_config::{BudgetConfig, ToolsConfig};
use parley_core::ConversationStore;
use parley_retrieval::SourceSelector;

use crate::ToolRegistry;

/// Registers the five built-in tools.
pub fn register_builtins(
    registry: &mut ToolRegistry,
    store: Arc<dyn ConversationStore>,
    selector: Arc<SourceSelector>,
    budget: &BudgetConfig,
    tools: &ToolsConfig,
) {
    registry.register(Arc::new(GetProductsTool));
    registry.register(Arc::new(ContactFormTool::new(store.clone())));
    registry.register(Arc::new(QuoteRequestTool::new(store)));
    registry.register(Arc::new(SearchKnowledgeBaseTool::new(
        selector,
        budget,
        tools.clone(),
    )));
    registry.register(Arc::new(AddRichContentTool));
}
