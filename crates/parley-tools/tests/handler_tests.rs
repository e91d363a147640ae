// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the built-in function handlers.

use std::sync::Arc;

use parley_config::{BudgetConfig, RetrievalConfig, ToolsConfig};
use parley_core::types::{Conversation, FunctionCall, RichContent, SubmissionKind};
use parley_core::{AppSettings, ConversationStore, KnowledgeSource};
use parley_retrieval::SourceSelector;
use parley_test_utils::{MemoryStore, MockProvider, fixtures};
use parley_tools::{ToolContext, ToolOutcome, ToolRegistry, default_registry};
use serde_json::{Value, json};

struct Harness {
    store: Arc<MemoryStore>,
    provider: Arc<MockProvider>,
    registry: ToolRegistry,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockProvider::new());
    let budget = BudgetConfig::default();
    let selector = Arc::new(SourceSelector::new(
        provider.clone(),
        budget.max_knowledge_sources_per_message,
        &RetrievalConfig::default(),
    ));
    let registry = default_registry(store.clone(), selector, &budget, &ToolsConfig::default());
    Harness {
        store,
        provider,
        registry,
    }
}

fn ctx<'a>(conversation: &'a Conversation, settings: &'a AppSettings) -> ToolContext<'a> {
    ToolContext {
        conversation_id: &conversation.id,
        bot_id: &conversation.bot_id,
        visitor_id: &conversation.visitor_id,
        ephemeral: conversation.ephemeral,
        settings,
    }
}

async fn run(h: &Harness, conversation: &Conversation, settings: &AppSettings, name: &str, args: Value) -> Value {
    let call = FunctionCall {
        name: name.to_string(),
        args,
    };
    match h.registry.dispatch(&call, &ctx(conversation, settings)).await {
        ToolOutcome::Result(value) => value,
        ToolOutcome::RichContent(card) => json!({ "card": card }),
    }
}

#[tokio::test]
async fn contact_form_without_name_fails_without_persisting() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    h.store.seed(conversation.clone());
    let result = run(
        &h,
        &conversation,
        &fixtures::settings(),
        "submitContactForm",
        json!({"name": "", "email": "a@b.com", "message": "hi"}),
    )
    .await;
    assert_eq!(result, json!({"success": false, "error": "Name is required"}));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn contact_form_rejects_malformed_email() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let result = run(
        &h,
        &conversation,
        &fixtures::settings(),
        "submitContactForm",
        json!({"name": "A", "email": "not-an-email", "message": "hi"}),
    )
    .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "Invalid email address");
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn valid_contact_form_is_stored() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    h.store.seed(conversation.clone());
    let result = run(
        &h,
        &conversation,
        &fixtures::settings(),
        "submitContactForm",
        json!({"name": "Ada", "email": "ada@example.com", "message": "Call me back"}),
    )
    .await;
    assert_eq!(result["success"], true);
    let stored = h.store.list_submissions(&conversation.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, SubmissionKind::Contact);
    assert_eq!(stored[0].message, "Call me back");
    assert_eq!(stored[0].visitor_id, conversation.visitor_id);
}

#[tokio::test]
async fn simulation_snapshot_from_json_never_writes() {
    let h = harness();
    let conversation: Conversation = serde_json::from_value(json!({
        "id": "sim_conv_123",
        "botId": "bot_acme",
        "visitorId": "visitor_1"
    }))
    .unwrap();
    let settings = fixtures::settings();

    let contact = run(
        &h,
        &conversation,
        &settings,
        "submitContactForm",
        json!({"name": "Ada", "email": "ada@example.com", "message": "hello"}),
    )
    .await;
    let quote = run(
        &h,
        &conversation,
        &settings,
        "submitQuoteRequest",
        json!({"name": "Ada", "email": "ada@example.com", "details": "20 licences"}),
    )
    .await;

    assert_eq!(contact["success"], true);
    assert_eq!(quote["success"], true);
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn simulation_conversations_never_write() {
    let h = harness();
    let conversation = Conversation::new("sim_conv_123", "bot_acme", "visitor_1");
    assert!(conversation.ephemeral);
    let settings = fixtures::settings();

    let contact = run(
        &h,
        &conversation,
        &settings,
        "submitContactForm",
        json!({"name": "Ada", "email": "ada@example.com", "message": "hello"}),
    )
    .await;
    let quote = run(
        &h,
        &conversation,
        &settings,
        "submitQuoteRequest",
        json!({"name": "Ada", "email": "ada@example.com", "details": "20 licences"}),
    )
    .await;

    assert_eq!(contact["success"], true);
    assert_eq!(quote["success"], true);
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn quote_request_requires_details_and_keeps_company() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    h.store.seed(conversation.clone());
    let settings = fixtures::settings();

    let missing = run(
        &h,
        &conversation,
        &settings,
        "submitQuoteRequest",
        json!({"name": "Ada", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(missing["error"], "Details are required");

    run(
        &h,
        &conversation,
        &settings,
        "submitQuoteRequest",
        json!({"name": "Ada", "email": "ada@example.com", "company": "Initech", "details": "20 licences"}),
    )
    .await;
    let stored = h.store.list_submissions(&conversation.id).await.unwrap();
    assert_eq!(stored[0].kind, SubmissionKind::Quote);
    assert_eq!(stored[0].company.as_deref(), Some("Initech"));
}

#[tokio::test]
async fn store_failure_is_reported_to_the_model() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    h.store.seed(conversation.clone());
    h.store.fail_writes();
    let result = run(
        &h,
        &conversation,
        &fixtures::settings(),
        "submitContactForm",
        json!({"name": "Ada", "email": "ada@example.com", "message": "hello"}),
    )
    .await;
    assert_eq!(result["success"], false);
}

#[tokio::test]
async fn get_products_always_succeeds() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let result = run(
        &h,
        &conversation,
        &fixtures::settings(),
        "getProducts",
        json!({"searchTerm": "OLED TV"}),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["products"][0]["name"], "OLED TV 55\"");
    assert_eq!(result["products"][0]["price"], 1299.0);
}

#[tokio::test]
async fn search_clamps_max_results() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let mut settings = fixtures::settings();
    settings.knowledge_base = fixtures::knowledge_sources(12);
    h.provider.push_text(json!((0..12).map(|i| i.to_string()).collect::<Vec<_>>()).to_string());

    let result = run(
        &h,
        &conversation,
        &settings,
        "searchKnowledgeBase",
        json!({"query": "docs", "maxResults": 50}),
    )
    .await;

    assert_eq!(result["results"].as_array().unwrap().len(), 10);
    assert_eq!(result["results"][0]["fullLength"], "Content of document 0.".len());
}

#[tokio::test]
async fn search_requires_query() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let result = run(&h, &conversation, &fixtures::settings(), "searchKnowledgeBase", json!({})).await;
    assert_eq!(result, json!({"success": false, "error": "Query is required"}));
}

#[tokio::test]
async fn oversized_search_caps_results_then_content() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let mut settings = fixtures::settings();
    settings.knowledge_base = (0..8)
        .map(|i| KnowledgeSource {
            id: format!("big-{i}"),
            name: format!("manual {i}"),
            content: "m".repeat(4000),
            ..KnowledgeSource::default()
        })
        .collect();
    h.provider.push_text(r#"["0","1","2","3","4","5","6","7"]"#);

    let result = run(
        &h,
        &conversation,
        &settings,
        "searchKnowledgeBase",
        json!({"query": "manual", "maxResults": 8}),
    )
    .await;

    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[0]["content"].as_str().unwrap().chars().count(), 503);
    assert_eq!(results[0]["fullLength"], 4000);
    assert!(result.to_string().chars().count() <= 5000);
}

#[tokio::test]
async fn rich_content_yields_a_card_only_when_enabled() {
    let h = harness();
    let conversation = fixtures::conversation(vec![]);
    let mut settings = fixtures::settings();
    let args = json!({"type": "productCard", "title": "OLED TV", "url": "https://example.com/oled"});

    let disabled = run(&h, &conversation, &settings, "addRichContent", args.clone()).await;
    assert_eq!(disabled["error"], "Unknown function: addRichContent");

    settings.behavior.rich_content_enabled = true;
    let call = FunctionCall {
        name: "addRichContent".into(),
        args,
    };
    let outcome = h.registry.dispatch(&call, &ctx(&conversation, &settings)).await;
    assert!(matches!(outcome, ToolOutcome::RichContent(RichContent::ProductCard(ref c)) if c.title == "OLED TV"));
}

#[test]
fn declarations_are_sorted_and_follow_settings() {
    let h = harness();
    let names = |enabled| -> Vec<String> {
        h.registry
            .declarations(enabled)
            .into_iter()
            .map(|d| d.name)
            .collect()
    };
    assert_eq!(
        names(false),
        vec!["getProducts", "searchKnowledgeBase", "submitContactForm", "submitQuoteRequest"]
    );
    assert_eq!(names(true)[0], "addRichContent");
    assert_eq!(names(true).len(), 5);
}
