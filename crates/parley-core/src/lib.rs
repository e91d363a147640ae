// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley support engine.
//!
//! This crate provides the data model (conversations, bot settings, model
//! turns), the adapter traits for the model and persistence collaborators,
//! and the error type shared across the workspace.

pub mod error;
pub mod settings;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use settings::{AppSettings, KnowledgeSource, Language, Scenario, SourceKind};
pub use types::{
    AdapterType, Conversation, HealthStatus, Message, RichContent, Sender, Submission,
    SubmissionKind, Turn,
};

pub use traits::{ConversationStore, ModelProvider, PluginAdapter};
