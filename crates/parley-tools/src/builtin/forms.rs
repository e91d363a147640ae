// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `submitContactForm` and `submitQuoteRequest`.
//!
//! Both validate the visitor's details, then append a submission to the
//! conversation. Ephemeral conversations skip the store entirely.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::Utc;
use parley_core::types::{Submission, SubmissionKind};
use parley_core::{ConversationStore, ParleyError};
use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::args::{SUBMIT_CONTACT_FORM, SUBMIT_QUOTE_REQUEST, ToolCall};
use crate::tool::{Tool, ToolContext, ToolOutcome, mismatched};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn require<'a>(value: &'a str, error: &str) -> Result<&'a str, String> {
    let value = value.trim();
    if value.is_empty() {
        Err(error.to_string())
    } else {
        Ok(value)
    }
}

fn validate_email(email: &str) -> Result<&str, String> {
    let email = require(email, "Email is required")?;
    if is_valid_email(email) {
        Ok(email)
    } else {
        Err("Invalid email address".to_string())
    }
}

/// Persist a submission unless the conversation is ephemeral.
async fn persist(
    store: &dyn ConversationStore,
    ctx: &ToolContext<'_>,
    submission: Submission,
    confirmation: String,
) -> ToolOutcome {
    if ctx.ephemeral {
        debug!(
            conversation_id = ctx.conversation_id,
            kind = %submission.kind,
            "ephemeral conversation, submission not stored"
        );
        return ToolOutcome::Result(json!({ "success": true, "message": confirmation }));
    }
    match store.append_submission(ctx.conversation_id, &submission).await {
        Ok(()) => {
            info!(
                conversation_id = ctx.conversation_id,
                submission_id = %submission.id,
                kind = %submission.kind,
                "submission stored"
            );
            ToolOutcome::Result(json!({ "success": true, "message": confirmation }))
        }
        Err(e) => {
            warn!(conversation_id = ctx.conversation_id, error = %e, "failed to store submission");
            ToolOutcome::failure("The request could not be saved. Please try again later.")
        }
    }
}

fn submission(ctx: &ToolContext<'_>, kind: SubmissionKind, name: &str, email: &str) -> Submission {
    Submission {
        id: uuid::Uuid::new_v4().to_string(),
        kind,
        bot_id: ctx.bot_id.to_string(),
        visitor_id: ctx.visitor_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        company: None,
        message: String::new(),
        submitted_at: Utc::now(),
    }
}

pub struct ContactFormTool {
    store: Arc<dyn ConversationStore>,
}

impl ContactFormTool {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ContactFormTool {
    fn name(&self) -> &str {
        SUBMIT_CONTACT_FORM
    }

    fn description(&self) -> &str {
        "Send the visitor's contact request to the team. Only call once the visitor has given their name, email address and message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Visitor's full name" },
                "email": { "type": "string", "description": "Visitor's email address" },
                "message": { "type": "string", "description": "What the visitor wants to tell the team" }
            },
            "required": ["name", "email", "message"]
        })
    }

    async fn invoke(&self, call: ToolCall, ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError> {
        let ToolCall::SubmitContactForm(args) = call else {
            return Err(mismatched(self.name(), &call));
        };
        let validated = require(&args.name, "Name is required").and_then(|name| {
            let email = validate_email(&args.email)?;
            let message = require(&args.message, "Message is required")?;
            Ok((name, email, message))
        });
        let (name, email, message) = match validated {
            Ok(fields) => fields,
            Err(error) => return Ok(ToolOutcome::failure(error)),
        };

        let mut record = submission(ctx, SubmissionKind::Contact, name, email);
        record.message = message.to_string();
        let confirmation = format!("Thanks {name}, your message was sent. The team will reply to {email}.");
        Ok(persist(self.store.as_ref(), ctx, record, confirmation).await)
    }
}

pub struct QuoteRequestTool {
    store: Arc<dyn ConversationStore>,
}

impl QuoteRequestTool {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for QuoteRequestTool {
    fn name(&self) -> &str {
        SUBMIT_QUOTE_REQUEST
    }

    fn description(&self) -> &str {
        "Send the visitor's quote request to the sales team. Only call once the visitor has given their name, email address and project details."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Visitor's full name" },
                "email": { "type": "string", "description": "Visitor's email address" },
                "company": { "type": "string", "description": "Visitor's company, if given" },
                "details": { "type": "string", "description": "What the visitor needs a quote for" }
            },
            "required": ["name", "email", "details"]
        })
    }

    async fn invoke(&self, call: ToolCall, ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError> {
        let ToolCall::SubmitQuoteRequest(args) = call else {
            return Err(mismatched(self.name(), &call));
        };
        let validated = require(&args.name, "Name is required").and_then(|name| {
            let email = validate_email(&args.email)?;
            let details = require(&args.details, "Details are required")?;
            Ok((name, email, details))
        });
        let (name, email, details) = match validated {
            Ok(fields) => fields,
            Err(error) => return Ok(ToolOutcome::failure(error)),
        };

        let mut record = submission(ctx, SubmissionKind::Quote, name, email);
        record.message = details.to_string();
        record.company = args
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let confirmation = format!("Thanks {name}, your quote request was sent. The sales team will reply to {email}.");
        Ok(persist(self.store.as_ref(), ctx, record, confirmation).await)
    }
}
