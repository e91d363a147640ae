// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed tool arguments.
//!
//! Each tool's JSON arguments decode into one variant of [`ToolCall`],
//! selected by tool name through a dispatch table. Required string fields
//! default to empty so that a missing field reaches the handler's own
//! validation and produces a message the model can act on.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const GET_PRODUCTS: &str = "getProducts";
pub const SUBMIT_CONTACT_FORM: &str = "submitContactForm";
pub const SUBMIT_QUOTE_REQUEST: &str = "submitQuoteRequest";
pub const SEARCH_KNOWLEDGE_BASE: &str = "searchKnowledgeBase";
pub const ADD_RICH_CONTENT: &str = "addRichContent";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetProductsArgs {
    pub category: Option<String>,
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFormArgs {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequestArgs {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchArgs {
    pub query: String,
    /// Accepts `3` or `3.0`; clamped by the handler.
    pub max_results: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RichContentArgs {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// A decoded function call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetProducts(GetProductsArgs),
    SubmitContactForm(ContactFormArgs),
    SubmitQuoteRequest(QuoteRequestArgs),
    SearchKnowledgeBase(SearchArgs),
    AddRichContent(RichContentArgs),
}

type Decoder = fn(Value) -> Result<ToolCall, serde_json::Error>;

fn decode<T: DeserializeOwned>(args: Value, wrap: fn(T) -> ToolCall) -> Result<ToolCall, serde_json::Error> {
    serde_json::from_value(args).map(wrap)
}

static DECODERS: &[(&str, Decoder)] = &[
    (GET_PRODUCTS, |v: Value| decode(v, ToolCall::GetProducts)),
    (SUBMIT_CONTACT_FORM, |v: Value| decode(v, ToolCall::SubmitContactForm)),
    (SUBMIT_QUOTE_REQUEST, |v: Value| decode(v, ToolCall::SubmitQuoteRequest)),
    (SEARCH_KNOWLEDGE_BASE, |v: Value| decode(v, ToolCall::SearchKnowledgeBase)),
    (ADD_RICH_CONTENT, |v: Value| decode(v, ToolCall::AddRichContent)),
];

/// Why a function call could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    UnknownFunction(String),
    InvalidArguments { name: String, reason: String },
}

impl ToolCall {
    /// Decode `args` for the tool called `name`. Missing (null) args decode
    /// as an empty object.
    pub fn decode(name: &str, args: Value) -> Result<Self, DecodeError> {
        let decoder = DECODERS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| *d)
            .ok_or_else(|| DecodeError::UnknownFunction(name.to_string()))?;
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        decoder(args).map_err(|e| DecodeError::InvalidArguments {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetProducts(_) => GET_PRODUCTS,
            ToolCall::SubmitContactForm(_) => SUBMIT_CONTACT_FORM,
            ToolCall::SubmitQuoteRequest(_) => SUBMIT_QUOTE_REQUEST,
            ToolCall::SearchKnowledgeBase(_) => SEARCH_KNOWLEDGE_BASE,
            ToolCall::AddRichContent(_) => ADD_RICH_CONTENT,
        }
    }

    /// True for handlers that write to the conversation store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ToolCall::SubmitContactForm(_) | ToolCall::SubmitQuoteRequest(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_by_name() {
        let call = ToolCall::decode(
            SUBMIT_QUOTE_REQUEST,
            json!({"name": "Ada", "email": "ada@example.com", "details": "50 seats"}),
        )
        .unwrap();
        match call {
            ToolCall::SubmitQuoteRequest(args) => {
                assert_eq!(args.details, "50 seats");
                assert_eq!(args.company, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let call = ToolCall::decode(SUBMIT_CONTACT_FORM, json!({"email": "a@b.com"})).unwrap();
        assert_eq!(
            call,
            ToolCall::SubmitContactForm(ContactFormArgs {
                email: "a@b.com".into(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn null_args_decode_as_empty_object() {
        assert_eq!(
            ToolCall::decode(GET_PRODUCTS, Value::Null).unwrap(),
            ToolCall::GetProducts(GetProductsArgs::default())
        );
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            ToolCall::decode("deleteEverything", json!({})),
            Err(DecodeError::UnknownFunction("deleteEverything".into()))
        );
    }

    #[test]
    fn wrong_types_are_invalid_arguments() {
        let err = ToolCall::decode(SEARCH_KNOWLEDGE_BASE, json!({"query": 42})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidArguments { name, .. } if name == SEARCH_KNOWLEDGE_BASE));
    }

    #[test]
    fn fractional_max_results_accepted() {
        let call = ToolCall::decode(SEARCH_KNOWLEDGE_BASE, json!({"query": "q", "maxResults": 3.0})).unwrap();
        assert!(matches!(call, ToolCall::SearchKnowledgeBase(SearchArgs { max_results: Some(m), .. }) if m == 3.0));
    }

    #[test]
    fn write_handlers_are_flagged() {
        assert!(ToolCall::SubmitContactForm(Default::default()).is_write());
        assert!(!ToolCall::GetProducts(Default::default()).is_write());
    }
}
