// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `searchKnowledgeBase`: explicit retrieval requested by the model.

use std::sync::Arc;

use async_trait::async_trait;
use parley_config::{BudgetConfig, ToolsConfig};
use parley_context::truncate;
use parley_core::{KnowledgeSource, ParleyError};
use parley_retrieval::SourceSelector;
use serde_json::{Value, json};
use tracing::debug;

use crate::args::{SEARCH_KNOWLEDGE_BASE, ToolCall};
use crate::tool::{Tool, ToolContext, ToolOutcome, mismatched};

/// Searches the bot's knowledge base through the source selector.
pub struct SearchKnowledgeBaseTool {
    selector: Arc<SourceSelector>,
    config: ToolsConfig,
    content_characters: usize,
    max_response_characters: usize,
}

impl SearchKnowledgeBaseTool {
    pub fn new(selector: Arc<SourceSelector>, budget: &BudgetConfig, config: ToolsConfig) -> Self {
        Self {
            selector,
            config,
            content_characters: budget.max_characters_per_knowledge_source,
            max_response_characters: budget.max_characters_in_function_response,
        }
    }

    /// `maxResults` defaulted and clamped to `[1, max_search_results]`.
    pub fn result_limit(&self, requested: Option<f64>) -> usize {
        let max = self.config.max_search_results.max(1);
        match requested {
            Some(n) if n.is_finite() => (n.round().max(1.0) as usize).min(max),
            _ => self.config.default_search_results.clamp(1, max),
        }
    }

    fn results(&self, sources: &[&KnowledgeSource], content_characters: usize) -> Vec<Value> {
        sources
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "type": s.kind,
                    "content": truncate(&s.content, content_characters),
                    "fullLength": s.content.chars().count(),
                })
            })
            .collect()
    }

    fn fits(&self, query: &str, results: &[Value]) -> bool {
        response(query, results).to_string().chars().count() <= self.max_response_characters
    }
}

fn response(query: &str, results: &[Value]) -> Value {
    json!({
        "success": true,
        "query": query,
        "results": results,
    })
}

#[async_trait]
impl Tool for SearchKnowledgeBaseTool {
    fn name(&self) -> &str {
        SEARCH_KNOWLEDGE_BASE
    }

    fn description(&self) -> &str {
        "Search the company knowledge base for documents relevant to a query."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "What to look for" },
                "maxResults": {
                    "type": "integer",
                    "description": "Number of documents to return (1-10, default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, call: ToolCall, ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError> {
        let ToolCall::SearchKnowledgeBase(args) = call else {
            return Err(mismatched(self.name(), &call));
        };
        let query = args.query.trim();
        if query.is_empty() {
            return Ok(ToolOutcome::failure("Query is required"));
        }

        let knowledge = &ctx.settings.knowledge_base;
        if knowledge.is_empty() {
            return Ok(ToolOutcome::Result(json!({
                "success": true,
                "query": query,
                "results": [],
                "message": "The knowledge base is empty."
            })));
        }

        let limit = self.result_limit(args.max_results);
        let ids = self.selector.select_sources_with_limit(query, knowledge, limit).await;
        let mut sources: Vec<&KnowledgeSource> = ids
            .iter()
            .filter_map(|id| knowledge.iter().find(|s| &s.id == id))
            .collect();

        let mut results = self.results(&sources, self.content_characters);
        if !self.fits(query, &results) {
            sources.truncate(self.config.overflow_result_cap);
            results = self.results(&sources, self.content_characters);
            if !self.fits(query, &results) {
                debug!(query, "search results over budget, shortening each result");
                results = self.results(&sources, self.config.overflow_snippet_characters);
            }
        }
        Ok(ToolOutcome::Result(response(query, &results)))
    }
}
