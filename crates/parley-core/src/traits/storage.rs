// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait for the persistence collaborator.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Conversation, Message, Submission};

/// Adapter for conversation and submission persistence.
///
/// The engine only reads conversation snapshots and appends submissions;
/// the remaining operations serve the chat transport around it.
/// Ephemeral conversations must never be passed to a store.
#[async_trait]
pub trait ConversationStore: PluginAdapter {
    /// Initializes the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ParleyError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), ParleyError>;

    /// Starts a conversation for a visitor/bot pair, ending any conversation
    /// still active for that pair.
    async fn start_conversation(
        &self,
        bot_id: &str,
        visitor_id: &str,
        visitor_name: Option<&str>,
    ) -> Result<Conversation, ParleyError>;

    /// Loads a conversation with its messages and submissions.
    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, ParleyError>;

    /// Appends a message to a conversation.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: &Message,
    ) -> Result<(), ParleyError>;

    /// Replaces a streaming message's text and clears its streaming flag.
    async fn finish_streaming(
        &self,
        conversation_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<(), ParleyError>;

    /// Appends a contact or quote submission to a conversation.
    async fn append_submission(
        &self,
        conversation_id: &str,
        submission: &Submission,
    ) -> Result<(), ParleyError>;

    /// Lists the submissions recorded for a conversation, oldest first.
    async fn list_submissions(&self, conversation_id: &str)
    -> Result<Vec<Submission>, ParleyError>;
}
