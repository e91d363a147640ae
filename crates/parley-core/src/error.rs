// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley support engine.

use thiserror::Error;

/// The primary error type used across all Parley adapter traits and engine operations.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Model provider errors (HTTP failure, malformed response, API error).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A model call exceeded its deadline. Never retried mid-protocol.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The model returned no text where the protocol requires it.
    #[error("model returned an empty response in round {round}")]
    EmptyResponse { round: u8 },

    /// Tools produced rich content but the final model call returned no text.
    #[error("model returned an empty response after tool calls ({rich_content} rich content items pending)")]
    EmptyResponseAfterTools { rich_content: usize },

    /// A tool handler failed in a way that cannot be reported back to the model.
    #[error("tool error: {message}")]
    Tool { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Returns true for failures of the tool-calling protocol itself.
    ///
    /// These are fatal for the request; the chat endpoint renders a generic
    /// apology instead of the raw error.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            ParleyError::EmptyResponse { .. } | ParleyError::EmptyResponseAfterTools { .. }
        )
    }
}
