// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation lifecycle against a real SQLite file.

use chrono::Utc;
use parley_config::model::StorageConfig;
use parley_core::types::{Message, Sender, Submission, SubmissionKind};
use parley_core::{ConversationStore, ParleyError};
use parley_storage::SqliteStore;
use tempfile::{TempDir, tempdir};

async fn open_store() -> (SqliteStore, TempDir) {
    let dir = tempdir().unwrap();
    let store = SqliteStore::new(StorageConfig {
        database_path: dir.path().join("parley.db").to_str().unwrap().to_string(),
        wal_mode: true,
    });
    store.initialize().await.unwrap();
    (store, dir)
}

#[tokio::test]
async fn full_conversation_lifecycle() {
    let (store, _dir) = open_store().await;
    let conversation = store
        .start_conversation("bot_acme", "visitor_1", Some("Ada"))
        .await
        .unwrap();
    assert!(conversation.id.starts_with("conv_"));
    assert!(!conversation.ephemeral);

    store
        .append_message(&conversation.id, &Message::new(Sender::User, "Do you ship to Lyon?"))
        .await
        .unwrap();
    let mut reply = Message::new(Sender::Bot, "");
    reply.is_streaming = true;
    store.append_message(&conversation.id, &reply).await.unwrap();

    let loaded = store.get_conversation(&conversation.id).await.unwrap().unwrap();
    assert!(loaded.messages[1].is_in_flight());

    store
        .finish_streaming(&conversation.id, &reply.id, "Yes, we ship across France.")
        .await
        .unwrap();
    store
        .append_submission(
            &conversation.id,
            &Submission {
                id: "sub-1".to_string(),
                kind: SubmissionKind::Contact,
                bot_id: "bot_acme".to_string(),
                visitor_id: "visitor_1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                company: None,
                message: "Please call me".to_string(),
                submitted_at: Utc::now(),
            },
        )
        .await
        .unwrap();

    let loaded = store.get_conversation(&conversation.id).await.unwrap().unwrap();
    assert_eq!(loaded.visitor_name.as_deref(), Some("Ada"));
    assert_eq!(loaded.messages.len(), 2);
    assert_eq!(loaded.messages[1].text, "Yes, we ship across France.");
    assert!(!loaded.messages[1].is_streaming);
    assert_eq!(loaded.latest_user_message().unwrap().text, "Do you ship to Lyon?");
    assert_eq!(loaded.submissions.len(), 1);
    assert_eq!(
        store.list_submissions(&conversation.id).await.unwrap(),
        loaded.submissions
    );

    store.close().await.unwrap();
}

#[tokio::test]
async fn new_conversation_ends_previous_one_for_pair() {
    let (store, _dir) = open_store().await;
    let first = store.start_conversation("bot", "visitor", None).await.unwrap();
    let other = store.start_conversation("bot", "someone-else", None).await.unwrap();
    let second = store.start_conversation("bot", "visitor", None).await.unwrap();

    assert!(store.get_conversation(&first.id).await.unwrap().unwrap().ended);
    assert!(!store.get_conversation(&second.id).await.unwrap().unwrap().ended);
    assert!(!store.get_conversation(&other.id).await.unwrap().unwrap().ended);
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("reopen.db").to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let id = {
        let store = SqliteStore::new(config.clone());
        store.initialize().await.unwrap();
        let conversation = store.start_conversation("bot", "visitor", None).await.unwrap();
        store
            .append_message(&conversation.id, &Message::new(Sender::User, "hello"))
            .await
            .unwrap();
        store.close().await.unwrap();
        conversation.id
    };

    let store = SqliteStore::new(config);
    store.initialize().await.unwrap();
    let loaded = store.get_conversation(&id).await.unwrap().unwrap();
    assert_eq!(loaded.messages[0].text, "hello");
}

#[tokio::test]
async fn writes_to_unknown_conversation_fail() {
    let (store, _dir) = open_store().await;
    let err = store
        .append_message("conv_missing", &Message::new(Sender::User, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ParleyError::Storage { .. }));
}
