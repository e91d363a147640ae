// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parley_core::types::{AdapterType, Conversation, HealthStatus, Message, Submission};
use parley_core::{ConversationStore, ParleyError, PluginAdapter};

/// A `ConversationStore` kept in a `HashMap`.
///
/// Counts every write so tests can assert that nothing was persisted, and
/// can be switched into a failing mode to exercise store-error paths.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<String, Conversation>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful or attempted writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with a storage error.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Store a conversation snapshot directly, bypassing the write counter.
    pub fn seed(&self, conversation: Conversation) {
        lock(&self.conversations).insert(conversation.id.clone(), conversation);
    }

    fn write(&self) -> Result<(), ParleyError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ParleyError::Storage {
                source: "memory store configured to fail".into(),
            });
        }
        Ok(())
    }

    fn with_conversation<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Conversation) -> T,
    ) -> Result<T, ParleyError> {
        let mut conversations = lock(&self.conversations);
        let conversation = conversations.get_mut(id).ok_or_else(|| ParleyError::Storage {
            source: format!("conversation not found: {id}").into(),
        })?;
        Ok(f(conversation))
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn initialize(&self) -> Result<(), ParleyError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), ParleyError> {
        Ok(())
    }

    async fn start_conversation(
        &self,
        bot_id: &str,
        visitor_id: &str,
        visitor_name: Option<&str>,
    ) -> Result<Conversation, ParleyError> {
        self.write()?;
        let mut conversations = lock(&self.conversations);
        for existing in conversations.values_mut() {
            if existing.bot_id == bot_id && existing.visitor_id == visitor_id {
                existing.ended = true;
            }
        }
        let mut conversation = Conversation::new(
            format!("conv_{}", uuid::Uuid::new_v4().simple()),
            bot_id,
            visitor_id,
        );
        conversation.visitor_name = visitor_name.map(str::to_string);
        conversations.insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ParleyError> {
        Ok(lock(&self.conversations).get(id).cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        message: &Message,
    ) -> Result<(), ParleyError> {
        self.write()?;
        self.with_conversation(conversation_id, |c| c.push(message.clone()))
    }

    async fn finish_streaming(
        &self,
        conversation_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<(), ParleyError> {
        self.write()?;
        self.with_conversation(conversation_id, |c| {
            if let Some(m) = c.messages.iter_mut().find(|m| m.id == message_id) {
                m.text = text.to_string();
                m.is_streaming = false;
            }
        })
    }

    async fn append_submission(
        &self,
        conversation_id: &str,
        submission: &Submission,
    ) -> Result<(), ParleyError> {
        self.write()?;
        self.with_conversation(conversation_id, |c| c.submissions.push(submission.clone()))
    }

    async fn list_submissions(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Submission>, ParleyError> {
        self.with_conversation(conversation_id, |c| c.submissions.clone())
    }
}

/// Lock, recovering from poisoning so one failed test cannot cascade.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}
