// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact and quote submissions.

use parley_core::ParleyError;
use parley_core::types::Submission;
use rusqlite::params;

use super::conversations::touch;
use super::{format_time, parse_enum, parse_time};
use crate::database::{Database, map_tr_err};

pub async fn insert(
    db: &Database,
    conversation_id: &str,
    submission: &Submission,
) -> Result<(), ParleyError> {
    let conversation_id = conversation_id.to_string();
    let s = submission.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            touch(&tx, &conversation_id)?;
            tx.execute(
                "INSERT INTO submissions
                 (id, conversation_id, kind, bot_id, visitor_id, name, email, company, message, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    s.id,
                    conversation_id,
                    s.kind.to_string(),
                    s.bot_id,
                    s.visitor_id,
                    s.name,
                    s.email,
                    s.company,
                    s.message,
                    format_time(&s.submitted_at),
                ],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list(db: &Database, conversation_id: &str) -> Result<Vec<Submission>, ParleyError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| load(conn, &conversation_id))
        .await
        .map_err(map_tr_err)
}

pub(crate) fn load(
    conn: &rusqlite::Connection,
    conversation_id: &str,
) -> rusqlite::Result<Vec<Submission>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, bot_id, visitor_id, name, email, company, message, submitted_at
         FROM submissions WHERE conversation_id = ?1 ORDER BY seq ASC",
    )?;
    let rows = stmt.query_map(params![conversation_id], |row| {
        Ok(Submission {
            id: row.get(0)?,
            kind: parse_enum(row, 1)?,
            bot_id: row.get(2)?,
            visitor_id: row.get(3)?,
            name: row.get(4)?,
            email: row.get(5)?,
            company: row.get(6)?,
            message: row.get(7)?,
            submitted_at: parse_time(row, 8)?,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations;
    use chrono::Utc;
    use parley_core::types::{Conversation, SubmissionKind};
    use tempfile::tempdir;

    fn quote(id: &str, company: Option<&str>) -> Submission {
        Submission {
            id: id.to_string(),
            kind: SubmissionKind::Quote,
            bot_id: "bot".to_string(),
            visitor_id: "visitor".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: company.map(str::to_string),
            message: "20 seats".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn submissions_roundtrip_with_optional_company() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        conversations::start(&db, &Conversation::new("conv_1", "bot", "visitor"))
            .await
            .unwrap();

        insert(&db, "conv_1", &quote("s1", Some("Acme"))).await.unwrap();
        insert(&db, "conv_1", &quote("s2", None)).await.unwrap();

        let listed = list(&db, "conv_1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].company.as_deref(), Some("Acme"));
        assert_eq!(listed[1].company, None);
        assert_eq!(listed[1].kind, SubmissionKind::Quote);
        assert!(list(&db, "other").await.unwrap().is_empty());
    }
}
