// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot configuration as authored in the admin console.
//!
//! The engine treats these as a read-only snapshot. Only the fields the
//! engine reads are modelled; presentation-only settings are left to the
//! widget.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Complete configuration of one bot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub appearance: Appearance,
    pub personality: Personality,
    pub behavior: Behavior,
    pub knowledge_base: Vec<KnowledgeSource>,
    /// Q&A pairs: each source's `name` is the question, `content` the answer.
    pub qna: Vec<KnowledgeSource>,
}

impl AppSettings {
    /// Returns true if the bot has any knowledge sources to retrieve from.
    pub fn has_knowledge(&self) -> bool {
        !self.knowledge_base.is_empty()
    }

    /// Returns true if the bot has any Q&A pairs configured.
    pub fn has_qna(&self) -> bool {
        !self.qna.is_empty()
    }
}

/// Branding. Colors are irrelevant to the engine and kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    pub brand_name: String,
    pub primary_color: Option<String>,
}

/// Conversational tone of the bot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Casual,
    Formal,
    Enthusiastic,
}

impl Tone {
    /// How the tone translates into writing style.
    pub fn style(&self) -> &'static str {
        match self {
            Tone::Friendly => "warm and approachable, using simple words",
            Tone::Professional => "courteous, precise and businesslike",
            Tone::Casual => "relaxed and conversational, like chatting with a friend",
            Tone::Formal => "polite and formal, avoiding slang and contractions",
            Tone::Enthusiastic => "upbeat and energetic, showing genuine excitement",
        }
    }
}

/// Language the bot replies in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

/// A string available in every supported bot language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub en: String,
    pub fr: String,
}

impl LocalizedText {
    /// Text for `language`, falling back to English when missing.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Fr if !self.fr.is_empty() => &self.fr,
            _ => &self.en,
        }
    }
}

/// A fixed exchange used to steer the model's behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub user_message: String,
    pub bot_response: String,
}

/// A suggested reply button shown by the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickReply {
    pub label: String,
    pub message: Option<String>,
}

/// Who the bot is and how it talks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Personality {
    pub tone: Tone,
    pub opening_message: LocalizedText,
    pub custom_instruction: String,
    pub scenarios: Vec<Scenario>,
    pub quick_replies: Vec<QuickReply>,
}

/// When the bot should collect visitor contact details.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactInfoPolicy {
    #[default]
    Optional,
    Required,
    Never,
}

/// Whether replies come from the model, from human agents, or both.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Ai,
    Human,
    Hybrid,
}

/// Behavioral switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Behavior {
    pub ask_for_name: bool,
    pub contact_info_policy: ContactInfoPolicy,
    pub lead_gen_hook: String,
    /// Admin-authored rule for when to submit the contact form.
    pub contact_rule: Option<String>,
    /// Admin-authored rule for when to submit a quote request.
    pub quote_rule: Option<String>,
    pub mode: OperatingMode,
    pub language: Language,
    pub rich_content_enabled: bool,
}

/// Origin of a knowledge source.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    #[default]
    File,
    Url,
    Qna,
}

/// A document the bot can draw on. Content is unbounded at rest and only
/// truncated when spliced into a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSource {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    pub name: String,
    #[serde(default)]
    pub content: String,
    /// Structured data extracted by the scraper (services, products, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<serde_json::Value>,
}
