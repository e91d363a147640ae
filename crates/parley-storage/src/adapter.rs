// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`ConversationStore`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use parley_config::model::StorageConfig;
use parley_core::types::{Conversation, Message, Submission};
use parley_core::{
    AdapterType, ConversationStore, HealthStatus, ParleyError, PluginAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed conversation store.
///
/// The database is opened by [`ConversationStore::initialize`]; every other
/// operation fails until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ParleyError> {
        self.db.get().ok_or_else(|| ParleyError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn initialize(&self) -> Result<(), ParleyError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ParleyError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ParleyError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn start_conversation(
        &self,
        bot_id: &str,
        visitor_id: &str,
        visitor_name: Option<&str>,
    ) -> Result<Conversation, ParleyError> {
        let mut conversation = Conversation::new(
            format!("conv_{}", uuid::Uuid::new_v4().simple()),
            bot_id,
            visitor_id,
        );
        conversation.visitor_name = visitor_name.map(str::to_string);
        let ended = queries::conversations::start(self.db()?, &conversation).await?;
        debug!(
            conversation_id = %conversation.id,
            bot_id,
            ended_previous = ended,
            "conversation started"
        );
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ParleyError> {
        queries::conversations::get(self.db()?, id).await
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        message: &Message,
    ) -> Result<(), ParleyError> {
        queries::messages::insert(self.db()?, conversation_id, message).await
    }

    async fn finish_streaming(
        &self,
        conversation_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<(), ParleyError> {
        let found =
            queries::messages::finish_streaming(self.db()?, conversation_id, message_id, text)
                .await?;
        if !found {
            warn!(conversation_id, message_id, "streaming message not found");
        }
        Ok(())
    }

    async fn append_submission(
        &self,
        conversation_id: &str,
        submission: &Submission,
    ) -> Result<(), ParleyError> {
        queries::submissions::insert(self.db()?, conversation_id, submission).await
    }

    async fn list_submissions(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Submission>, ParleyError> {
        queries::submissions::list(self.db()?, conversation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn reports_adapter_identity() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("id.db")));
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("none.db")));
        assert!(store.health_check().await.is_err());
        assert!(store.get_conversation("x").await.is_err());
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("twice.db")));
        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
