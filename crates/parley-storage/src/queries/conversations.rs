// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation rows.

use chrono::Utc;
use parley_core::ParleyError;
use parley_core::types::Conversation;
use rusqlite::{OptionalExtension, params};

use super::{format_time, messages, parse_enum, submissions};
use crate::database::{Database, map_tr_err};

/// Insert `conversation` and mark every still-open conversation of the same
/// bot/visitor pair as ended, in one transaction. Returns how many were ended.
pub async fn start(db: &Database, conversation: &Conversation) -> Result<usize, ParleyError> {
    let conversation = conversation.clone();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let now = format_time(&Utc::now());
            let tx = conn.transaction()?;
            let ended = tx.execute(
                "UPDATE conversations SET ended = 1, updated_at = ?1
                 WHERE bot_id = ?2 AND visitor_id = ?3 AND ended = 0",
                params![now, conversation.bot_id, conversation.visitor_id],
            )?;
            tx.execute(
                "INSERT INTO conversations
                 (id, bot_id, visitor_id, visitor_name, ended, status, summary, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    conversation.id,
                    conversation.bot_id,
                    conversation.visitor_id,
                    conversation.visitor_name,
                    conversation.ended,
                    conversation.status.to_string(),
                    conversation.summary,
                    now,
                ],
            )?;
            tx.commit()?;
            Ok(ended)
        })
        .await
        .map_err(map_tr_err)
}

/// Load a conversation with its messages and submissions.
pub async fn get(db: &Database, id: &str) -> Result<Option<Conversation>, ParleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Conversation>, rusqlite::Error> {
            let conversation = conn
                .query_row(
                    "SELECT id, bot_id, visitor_id, visitor_name, ended, status, summary
                     FROM conversations WHERE id = ?1",
                    params![id],
                    |row| {
                        let mut conversation = Conversation::new(
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        );
                        conversation.visitor_name = row.get(3)?;
                        conversation.ended = row.get(4)?;
                        conversation.status = parse_enum(row, 5)?;
                        conversation.summary = row.get(6)?;
                        Ok(conversation)
                    },
                )
                .optional()?;
            let Some(mut conversation) = conversation else {
                return Ok(None);
            };
            conversation.messages = messages::load(conn, &id)?;
            conversation.submissions = submissions::load(conn, &id)?;
            Ok(Some(conversation))
        })
        .await
        .map_err(map_tr_err)
}

/// Ids of conversations still open for a bot/visitor pair.
pub async fn open_for_pair(
    db: &Database,
    bot_id: &str,
    visitor_id: &str,
) -> Result<Vec<String>, ParleyError> {
    let bot_id = bot_id.to_string();
    let visitor_id = visitor_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id FROM conversations
                 WHERE bot_id = ?1 AND visitor_id = ?2 AND ended = 0
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![bot_id, visitor_id], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Bump `updated_at`. Fails with `QueryReturnedNoRows` if the conversation
/// does not exist.
pub(crate) fn touch(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<()> {
    let updated = conn.execute(
        "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
        params![format_time(&Utc::now()), id],
    )?;
    if updated == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::ConversationStatus;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn start_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let mut conversation = Conversation::new("conv_1", "bot_1", "visitor_1");
        conversation.visitor_name = Some("Ada".to_string());
        assert_eq!(start(&db, &conversation).await.unwrap(), 0);

        let loaded = get(&db, "conv_1").await.unwrap().unwrap();
        assert_eq!(loaded.bot_id, "bot_1");
        assert_eq!(loaded.visitor_name.as_deref(), Some("Ada"));
        assert_eq!(loaded.status, ConversationStatus::Pending);
        assert!(!loaded.ended);
        assert!(loaded.messages.is_empty());
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn starting_again_ends_only_the_same_pair() {
        let (db, _dir) = setup_db().await;
        start(&db, &Conversation::new("c1", "bot", "v1")).await.unwrap();
        start(&db, &Conversation::new("other", "bot", "v2")).await.unwrap();
        assert_eq!(start(&db, &Conversation::new("c2", "bot", "v1")).await.unwrap(), 1);

        assert_eq!(open_for_pair(&db, "bot", "v1").await.unwrap(), vec!["c2".to_string()]);
        assert_eq!(open_for_pair(&db, "bot", "v2").await.unwrap().len(), 1);
        assert!(get(&db, "c1").await.unwrap().unwrap().ended);
    }

    #[tokio::test]
    async fn touch_rejects_unknown_conversation() {
        let (db, _dir) = setup_db().await;
        let result = db
            .connection()
            .call(|conn| touch(conn, "missing"))
            .await;
        assert!(result.is_err());
    }
}
