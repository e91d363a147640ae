// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Parley engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Conversation id prefixes reserved for "try without saving" simulations.
///
/// Only [`Conversation::new`] consults these; everything downstream reads
/// the [`Conversation::ephemeral`] flag instead.
pub const SIMULATION_PREFIXES: &[&str] = &["sim_conv_", "sim_"];

/// Returns true if `id` uses the simulation id convention.
pub fn is_simulation_id(id: &str) -> bool {
    SIMULATION_PREFIXES.iter().any(|p| id.starts_with(p))
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Conversation types ---

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    Agent,
    System,
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Set while a bot response is still being streamed to the widget.
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    /// Creates a finished message with a fresh id and the current time.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            is_streaming: false,
        }
    }

    /// System messages never reach the model or summaries.
    pub fn is_context_eligible(&self) -> bool {
        self.sender != Sender::System
    }

    /// A bot/agent message that is still streaming and has no text yet.
    pub fn is_in_flight(&self) -> bool {
        self.is_streaming && self.text.trim().is_empty()
    }
}

/// Whether a human agent has dealt with the conversation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Pending,
    Handled,
}

/// Which form a submission came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubmissionKind {
    Contact,
    Quote,
}

/// A contact form or quote request captured by a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub kind: SubmissionKind,
    pub bot_id: String,
    pub visitor_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Free text: the contact message or the quote details.
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// All messages exchanged between one visitor and one bot.
///
/// Deserialization goes through [`ConversationRecord`] so a snapshot whose id
/// uses the simulation convention is ephemeral even if the flag was omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ConversationRecord")]
pub struct Conversation {
    pub id: String,
    pub bot_id: String,
    pub visitor_id: String,
    pub visitor_name: Option<String>,
    pub messages: Vec<Message>,
    pub ended: bool,
    pub status: ConversationStatus,
    pub summary: Option<String>,
    pub submissions: Vec<Submission>,
    /// Ephemeral conversations never touch the persistence layer.
    pub ephemeral: bool,
}

/// Wire shape of a [`Conversation`] snapshot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationRecord {
    id: String,
    bot_id: String,
    visitor_id: String,
    #[serde(default)]
    visitor_name: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    ended: bool,
    #[serde(default)]
    status: ConversationStatus,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    submissions: Vec<Submission>,
    #[serde(default)]
    ephemeral: bool,
}

impl From<ConversationRecord> for Conversation {
    fn from(record: ConversationRecord) -> Self {
        let ephemeral = record.ephemeral || is_simulation_id(&record.id);
        Self {
            id: record.id,
            bot_id: record.bot_id,
            visitor_id: record.visitor_id,
            visitor_name: record.visitor_name,
            messages: record.messages,
            ended: record.ended,
            status: record.status,
            summary: record.summary,
            submissions: record.submissions,
            ephemeral,
        }
    }
}

impl Conversation {
    /// Creates an empty conversation. The ephemeral flag is decided here
    /// from the id convention; snapshots read from JSON get the same rule.
    pub fn new(
        id: impl Into<String>,
        bot_id: impl Into<String>,
        visitor_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let ephemeral = is_simulation_id(&id);
        Self {
            id,
            bot_id: bot_id.into(),
            visitor_id: visitor_id.into(),
            visitor_name: None,
            messages: Vec::new(),
            ended: false,
            status: ConversationStatus::Pending,
            summary: None,
            submissions: Vec::new(),
            ephemeral,
        }
    }

    /// Creates an ephemeral conversation for trying a bot without saving anything.
    pub fn simulation(bot_id: impl Into<String>) -> Self {
        Self::new(
            format!("sim_conv_{}", uuid::Uuid::new_v4().simple()),
            bot_id,
            "simulator",
        )
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The most recent message sent by the visitor.
    pub fn latest_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.sender == Sender::User)
    }
}

// --- Rich content ---

/// A card introducing a person (sales rep, support agent, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// A card linking to a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Structured content surfaced to the widget next to the reply text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RichContent {
    PersonCard(PersonCard),
    ProductCard(ProductCard),
}

// --- Model types ---

/// Author of a model turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A function the model asked to call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// The result of a function call, sent back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

/// One piece of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

/// One conversational turn as sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A user turn holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A model turn holding a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenation of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A function the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A request to the model collaborator.
///
/// Either `tools` or `response_schema` is used, never both: classification
/// calls constrain the output to JSON, orchestration calls attach tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Turn>,
    pub system_instruction: Option<String>,
    pub tools: Vec<ToolDeclaration>,
    pub response_schema: Option<serde_json::Value>,
}

/// A response from the model collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub function_calls: Vec<FunctionCall>,
}

impl GenerateResponse {
    /// A text-only response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_calls: Vec::new(),
        }
    }

    /// A response carrying only function calls.
    pub fn calls(function_calls: Vec<FunctionCall>) -> Self {
        Self {
            text: None,
            function_calls,
        }
    }

    /// The response text, if present and not blank.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}
