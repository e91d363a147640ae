// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for source selection against a scripted model.

use std::sync::Arc;

use parley_config::RetrievalConfig;
use parley_retrieval::SourceSelector;
use parley_test_utils::{MockProvider, fixtures};

fn selector(provider: &Arc<MockProvider>) -> SourceSelector {
    SourceSelector::new(provider.clone(), 2, &RetrievalConfig::default())
}

#[tokio::test]
async fn small_knowledge_base_skips_model() {
    let provider = Arc::new(MockProvider::new());
    let sources = fixtures::knowledge_sources(2);
    let ids = selector(&provider).select_sources("anything", &sources).await;
    assert_eq!(ids, vec!["src-0", "src-1"]);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn model_selection_maps_indices_to_ids() {
    let provider = Arc::new(MockProvider::new());
    provider.push_text(r#"["3", "1"]"#);
    let sources = fixtures::knowledge_sources(5);
    let ids = selector(&provider).select_sources("warranty", &sources).await;
    assert_eq!(ids, vec!["src-3", "src-1"]);

    let prompt = provider.requests()[0].contents[0].text();
    assert!(prompt.contains("[4] id=src-4"));
    assert!(prompt.contains("warranty"));
}

#[tokio::test]
async fn preview_is_limited_to_configured_characters() {
    let provider = Arc::new(MockProvider::new());
    provider.push_text(r#"["0"]"#);
    let mut sources = fixtures::knowledge_sources(3);
    sources[0].content = format!("{}{}", "a".repeat(300), "TAIL");
    selector(&provider).select_sources("q", &sources).await;
    assert!(!provider.requests()[0].contents[0].text().contains("TAIL"));
}

#[tokio::test]
async fn invalid_selection_falls_back_to_first_sources() {
    let provider = Arc::new(MockProvider::new());
    provider.push_text(r#"["17", "nope"]"#);
    let sources = fixtures::knowledge_sources(4);
    let ids = selector(&provider).select_sources("q", &sources).await;
    assert_eq!(ids, vec!["src-0", "src-1"]);
}

#[tokio::test]
async fn provider_error_falls_back_to_first_sources() {
    let provider = Arc::new(MockProvider::new());
    provider.push_error("quota exceeded");
    let sources = fixtures::knowledge_sources(4);
    let ids = selector(&provider).select_sources("q", &sources).await;
    assert_eq!(ids, vec!["src-0", "src-1"]);
}

#[tokio::test]
async fn repeated_question_is_served_from_cache() {
    let provider = Arc::new(MockProvider::new());
    provider.push_text(r#"["2"]"#);
    let sources = fixtures::knowledge_sources(4);
    let selector = selector(&provider);
    let first = selector.select_sources("q", &sources).await;
    let second = selector.select_sources("q", &sources).await;
    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn fallbacks_are_not_cached() {
    let provider = Arc::new(MockProvider::new());
    provider.push_error("boom");
    provider.push_text(r#"["3"]"#);
    let sources = fixtures::knowledge_sources(4);
    let selector = selector(&provider);
    assert_eq!(selector.select_sources("q", &sources).await, vec!["src-0", "src-1"]);
    assert_eq!(selector.select_sources("q", &sources).await, vec!["src-3"]);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn explicit_limit_overrides_budget() {
    let provider = Arc::new(MockProvider::new());
    let sources = fixtures::knowledge_sources(5);
    let ids = selector(&provider)
        .select_sources_with_limit("q", &sources, 5)
        .await;
    assert_eq!(ids.len(), 5);
    assert_eq!(provider.call_count(), 0);
}
