// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splicing retrieved knowledge into the visitor's latest message.

use parley_config::{BudgetConfig, RetrievalConfig};
use parley_core::KnowledgeSource;

use crate::truncate::truncate;

const PREAMBLE_WITH_QNA: &str = "Answer the visitor's question using the documents below. The \
frequently asked questions in your instructions take priority: when one of them answers the \
question, use it and ignore conflicting documents.";

const PREAMBLE_WITHOUT_QNA: &str = "Answer the visitor's question using the documents below. If \
they do not contain the answer, say so instead of guessing.";

/// Marks where the visitor's own words begin.
pub const QUESTION_MARKER: &str = "Visitor question:";

/// Character caps applied to each spliced source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeLimits {
    pub content_characters: usize,
    pub additional_data_characters: usize,
}

impl KnowledgeLimits {
    pub fn new(budget: &BudgetConfig, retrieval: &RetrievalConfig) -> Self {
        Self {
            content_characters: budget.max_characters_per_knowledge_source,
            additional_data_characters: retrieval.max_additional_data_characters,
        }
    }

    /// Both caps halved, for the total-size valve.
    pub fn halved(self) -> Self {
        Self {
            content_characters: self.content_characters / 2,
            additional_data_characters: self.additional_data_characters / 2,
        }
    }
}

/// Compact JSON of a source's structured data, truncated with the marker.
pub fn render_additional_data(data: &serde_json::Value, max_chars: usize) -> String {
    let json = serde_json::to_string(data).unwrap_or_default();
    truncate(&json, max_chars).into_owned()
}

fn source_block(source: &KnowledgeSource, limits: KnowledgeLimits) -> String {
    let mut block = format!(
        "### Source: {}\n{}",
        source.name,
        truncate(&source.content, limits.content_characters)
    );
    if let Some(data) = source.additional_data.as_ref().filter(|d| !d.is_null()) {
        block.push_str("\nStructured data: ");
        block.push_str(&render_additional_data(
            data,
            limits.additional_data_characters,
        ));
    }
    block
}

/// Rewrite a question into preamble, source blocks, then the question.
pub fn augment_question(
    question: &str,
    sources: &[&KnowledgeSource],
    has_qna: bool,
    limits: KnowledgeLimits,
) -> String {
    let preamble = if has_qna {
        PREAMBLE_WITH_QNA
    } else {
        PREAMBLE_WITHOUT_QNA
    };
    let blocks: Vec<String> = sources.iter().map(|s| source_block(s, limits)).collect();
    format!(
        "{preamble}\n\n{}\n\n---\n{QUESTION_MARKER} {question}",
        blocks.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truncate::TRUNCATION_MARKER;
    use parley_core::SourceKind;
    use serde_json::json;

    fn limits() -> KnowledgeLimits {
        KnowledgeLimits::new(&BudgetConfig::default(), &RetrievalConfig::default())
    }

    fn source(content: &str, data: Option<serde_json::Value>) -> KnowledgeSource {
        KnowledgeSource {
            id: "s1".into(),
            kind: SourceKind::Url,
            name: "pricing page".into(),
            content: content.into(),
            additional_data: data,
        }
    }

    #[test]
    fn question_follows_sources_under_marker() {
        let s = source("TVs start at $499.", None);
        let text = augment_question("How much is a TV?", &[&s], false, limits());
        assert!(text.starts_with(PREAMBLE_WITHOUT_QNA));
        assert!(text.contains("### Source: pricing page\nTVs start at $499."));
        assert!(text.ends_with("Visitor question: How much is a TV?"));
    }

    #[test]
    fn preamble_depends_on_qna() {
        let s = source("x", None);
        assert!(augment_question("q", &[&s], true, limits()).starts_with(PREAMBLE_WITH_QNA));
    }

    #[test]
    fn long_content_is_cut_to_budget_plus_marker() {
        let s = source(&"z".repeat(2600), None);
        let text = augment_question("q", &[&s], false, limits());
        let content_line = text
            .lines()
            .find(|l| l.starts_with('z'))
            .unwrap_or_default();
        assert!(content_line.ends_with(TRUNCATION_MARKER));
        assert_eq!(content_line.chars().count(), 2000 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn additional_data_has_its_own_cap() {
        let items: Vec<_> = (0..200).map(|i| json!({"service": format!("item {i}")})).collect();
        let s = source("short", Some(json!(items)));
        let text = augment_question("q", &[&s], false, limits());
        let data_line = text
            .lines()
            .find_map(|l| l.strip_prefix("Structured data: "))
            .unwrap_or_default();
        assert_eq!(data_line.chars().count(), 1000 + TRUNCATION_MARKER.len());
        assert!(data_line.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn halving_shrinks_both_caps() {
        let halved = limits().halved();
        assert_eq!(halved.content_characters, 1000);
        assert_eq!(halved.additional_data_characters, 500);
    }
}
