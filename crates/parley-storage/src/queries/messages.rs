// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message rows, kept in insertion order.

use parley_core::ParleyError;
use parley_core::types::Message;
use rusqlite::params;

use super::conversations::touch;
use super::{format_time, parse_enum, parse_time};
use crate::database::{Database, map_tr_err};

/// Append a message to an existing conversation.
pub async fn insert(
    db: &Database,
    conversation_id: &str,
    message: &Message,
) -> Result<(), ParleyError> {
    let conversation_id = conversation_id.to_string();
    let message = message.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            touch(&tx, &conversation_id)?;
            tx.execute(
                "INSERT INTO messages (id, conversation_id, sender, text, is_streaming, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.id,
                    conversation_id,
                    message.sender.to_string(),
                    message.text,
                    message.is_streaming,
                    format_time(&message.timestamp),
                ],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a streaming message's text and clear its streaming flag.
/// Returns false if no such message exists in the conversation.
pub async fn finish_streaming(
    db: &Database,
    conversation_id: &str,
    message_id: &str,
    text: &str,
) -> Result<bool, ParleyError> {
    let conversation_id = conversation_id.to_string();
    let message_id = message_id.to_string();
    let text = text.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE messages SET text = ?1, is_streaming = 0
                 WHERE id = ?2 AND conversation_id = ?3",
                params![text, message_id, conversation_id],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub(crate) fn load(conn: &rusqlite::Connection, conversation_id: &str) -> rusqlite::Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender, text, is_streaming, timestamp
         FROM messages WHERE conversation_id = ?1 ORDER BY seq ASC",
    )?;
    let rows = stmt.query_map(params![conversation_id], |row| {
        Ok(Message {
            id: row.get(0)?,
            sender: parse_enum(row, 1)?,
            text: row.get(2)?,
            is_streaming: row.get(3)?,
            timestamp: parse_time(row, 4)?,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations;
    use parley_core::types::{Conversation, Sender};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        conversations::start(&db, &Conversation::new("conv_1", "bot", "visitor"))
            .await
            .unwrap();
        (db, dir)
    }

    async fn load_all(db: &Database) -> Vec<Message> {
        db.connection()
            .call(|conn| load(conn, "conv_1"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn messages_come_back_in_insertion_order() {
        let (db, _dir) = setup_db().await;
        let first = Message::new(Sender::User, "hello");
        let second = Message::new(Sender::Bot, "hi there");
        insert(&db, "conv_1", &first).await.unwrap();
        insert(&db, "conv_1", &second).await.unwrap();

        let loaded = load_all(&db).await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text, "hello");
        assert_eq!(loaded[0].sender, Sender::User);
        assert_eq!(loaded[1].sender, Sender::Bot);
        assert_eq!(
            loaded[0].timestamp.timestamp_millis(),
            first.timestamp.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn insert_into_unknown_conversation_fails() {
        let (db, _dir) = setup_db().await;
        let result = insert(&db, "missing", &Message::new(Sender::User, "x")).await;
        assert!(matches!(result, Err(ParleyError::Storage { .. })));
    }

    #[tokio::test]
    async fn finish_streaming_replaces_text() {
        let (db, _dir) = setup_db().await;
        let mut streaming = Message::new(Sender::Bot, "");
        streaming.is_streaming = true;
        insert(&db, "conv_1", &streaming).await.unwrap();

        assert!(finish_streaming(&db, "conv_1", &streaming.id, "Done!").await.unwrap());
        let loaded = load_all(&db).await;
        assert_eq!(loaded[0].text, "Done!");
        assert!(!loaded[0].is_streaming);

        assert!(!finish_streaming(&db, "conv_1", "nope", "x").await.unwrap());
    }
}
