// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source selection: pick at most N knowledge sources for a question.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parley_config::RetrievalConfig;
use parley_core::types::{GenerateRequest, Turn};
use parley_core::{KnowledgeSource, ModelProvider, ParleyError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::SelectionCache;
use crate::json::parse_model_json;

const SELECTOR_INSTRUCTION: &str = "You select which knowledge-base documents a customer-support \
assistant should read to answer a visitor's question. You only see document metadata and a short \
preview. Respond with a JSON array of document indices (as strings), most relevant first.";

fn selection_schema() -> Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// Picks a bounded, relevant subset of the knowledge base.
pub struct SourceSelector {
    provider: Arc<dyn ModelProvider>,
    max_sources: usize,
    preview_characters: usize,
    cache: SelectionCache,
}

impl SourceSelector {
    /// `max_sources` is the per-message budget used by [`Self::select_sources`].
    pub fn new(provider: Arc<dyn ModelProvider>, max_sources: usize, config: &RetrievalConfig) -> Self {
        Self {
            provider,
            max_sources,
            preview_characters: config.preview_characters,
            cache: SelectionCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
        }
    }

    /// Select up to the per-message budget of source ids.
    pub async fn select_sources(&self, question: &str, sources: &[KnowledgeSource]) -> Vec<String> {
        self.select_sources_with_limit(question, sources, self.max_sources)
            .await
    }

    /// Select up to `limit` source ids.
    ///
    /// Small knowledge bases are returned whole without a model call. Never
    /// returns an empty list for a non-empty knowledge base and `limit > 0`.
    pub async fn select_sources_with_limit(
        &self,
        question: &str,
        sources: &[KnowledgeSource],
        limit: usize,
    ) -> Vec<String> {
        if sources.len() <= limit {
            debug!(sources = sources.len(), limit, "knowledge base fits budget, skipping selection");
            return sources.iter().map(|s| s.id.clone()).collect();
        }

        let key = SelectionCache::key(question, sources, limit);
        if let Some(ids) = self.cache.get(&key) {
            debug!(selected = ids.len(), "source selection cache hit");
            return ids;
        }

        match self.ask_model(question, sources, limit).await {
            Ok(raw) => {
                let indices = validate_indices(&raw, sources.len(), limit);
                if indices.is_empty() {
                    warn!(returned = raw.len(), "source selector returned no usable indices, using first sources");
                    return first_ids(sources, limit);
                }
                let ids: Vec<String> = indices.into_iter().map(|i| sources[i].id.clone()).collect();
                debug!(selected = ?ids, "sources selected");
                self.cache.insert(key, ids.clone());
                ids
            }
            Err(e) => {
                warn!(error = %e, "source selection failed, using first sources");
                first_ids(sources, limit)
            }
        }
    }

    async fn ask_model(
        &self,
        question: &str,
        sources: &[KnowledgeSource],
        limit: usize,
    ) -> Result<Vec<Value>, ParleyError> {
        let request = GenerateRequest {
            contents: vec![Turn::user(self.prompt(question, sources, limit))],
            system_instruction: Some(SELECTOR_INSTRUCTION.to_string()),
            tools: Vec::new(),
            response_schema: Some(selection_schema()),
        };
        let response = self.provider.generate(request).await?;
        let text = response.non_empty_text().ok_or_else(|| ParleyError::Provider {
            message: "source selector returned no text".to_string(),
            source: None,
        })?;
        parse_model_json(text).map_err(|e| ParleyError::Provider {
            message: format!("source selector returned malformed JSON: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn prompt(&self, question: &str, sources: &[KnowledgeSource], limit: usize) -> String {
        let mut prompt = format!("Visitor question: {question}\n\nDocuments:\n");
        for (index, source) in sources.iter().enumerate() {
            let preview: String = source.content.chars().take(self.preview_characters).collect();
            prompt.push_str(&format!(
                "[{index}] id={} name=\"{}\" type={}\npreview: {}\n\n",
                source.id, source.name, source.kind, preview
            ));
        }
        prompt.push_str(&format!(
            "Return at most {limit} indices as a JSON array of strings, for example [\"0\", \"3\"]."
        ));
        prompt
    }
}

/// Keep well-formed, in-range, first-seen indices up to `limit`.
fn validate_indices(raw: &[Value], len: usize, limit: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|v| match v {
            Value::String(s) => s.trim().parse::<usize>().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            _ => None,
        })
        .filter(|&i| i < len && seen.insert(i))
        .take(limit)
        .collect()
}

fn first_ids(sources: &[KnowledgeSource], limit: usize) -> Vec<String> {
    sources.iter().take(limit).map(|s| s.id.clone()).collect()
}
