// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Gemini `generateContent` endpoint.

use parley_core::types::{
    FunctionCall, FunctionResponse, GenerateRequest, GenerateResponse, Part, ToolDeclaration,
    Turn,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// Gemini parts are objects with exactly one of these fields set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSet {
    pub function_declarations: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::FunctionCall(call) => WirePart {
                function_call: Some(call.clone()),
                ..Default::default()
            },
            Part::FunctionResponse(response) => WirePart {
                function_response: Some(response.clone()),
                ..Default::default()
            },
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content {
            role: Some(turn.role.to_string()),
            parts: turn.parts.iter().map(WirePart::from).collect(),
        }
    }
}

impl From<&GenerateRequest> for GenerateContentRequest {
    fn from(request: &GenerateRequest) -> Self {
        Self {
            contents: request.contents.iter().map(Content::from).collect(),
            system_instruction: request.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![WirePart {
                    text: Some(text.clone()),
                    ..Default::default()
                }],
            }),
            tools: if request.tools.is_empty() {
                Vec::new()
            } else {
                vec![ToolSet {
                    function_declarations: request.tools.clone(),
                }]
            },
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            }),
        }
    }
}

impl From<GenerateContentResponse> for GenerateResponse {
    /// Only the first candidate is read. Text parts are concatenated.
    fn from(response: GenerateContentResponse) -> Self {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut text: Option<String> = None;
        let mut function_calls = Vec::new();
        for part in parts {
            if let Some(t) = part.text {
                text.get_or_insert_with(String::new).push_str(&t);
            }
            if let Some(call) = part.function_call {
                function_calls.push(call);
            }
        }
        GenerateResponse {
            text,
            function_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::Role;
    use serde_json::json;

    #[test]
    fn request_serializes_to_gemini_shape() {
        let request = GenerateRequest {
            contents: vec![
                Turn::user("price?"),
                Turn {
                    role: Role::Model,
                    parts: vec![Part::FunctionCall(FunctionCall {
                        name: "getProducts".into(),
                        args: json!({"searchTerm": "tv"}),
                    })],
                },
                Turn {
                    role: Role::User,
                    parts: vec![Part::FunctionResponse(FunctionResponse {
                        name: "getProducts".into(),
                        response: json!({"success": true}),
                    })],
                },
            ],
            system_instruction: Some("Be brief.".into()),
            tools: vec![ToolDeclaration {
                name: "getProducts".into(),
                description: "List products".into(),
                parameters: json!({"type": "OBJECT"}),
            }],
            response_schema: None,
        };

        let wire = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(wire["contents"][0], json!({"role": "user", "parts": [{"text": "price?"}]}));
        assert_eq!(
            wire["contents"][1]["parts"][0]["functionCall"],
            json!({"name": "getProducts", "args": {"searchTerm": "tv"}})
        );
        assert_eq!(
            wire["contents"][2]["parts"][0]["functionResponse"]["response"],
            json!({"success": true})
        );
        assert_eq!(wire["systemInstruction"], json!({"parts": [{"text": "Be brief."}]}));
        assert_eq!(wire["tools"][0]["functionDeclarations"][0]["name"], "getProducts");
        assert!(wire.get("generationConfig").is_none());
    }

    #[test]
    fn response_schema_becomes_json_generation_config() {
        let request = GenerateRequest {
            contents: vec![Turn::user("classify")],
            response_schema: Some(json!({"type": "OBJECT"})),
            ..Default::default()
        };
        let wire = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(wire["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(wire["generationConfig"]["responseSchema"], json!({"type": "OBJECT"}));
        assert!(wire.get("tools").is_none());
        assert!(wire.get("systemInstruction").is_none());
    }

    #[test]
    fn response_collects_text_and_calls() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Let me "},
                    {"text": "check."},
                    {"functionCall": {"name": "getProducts", "args": {}}}
                ]},
                "finishReason": "STOP"
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let response = GenerateResponse::from(parsed);
        assert_eq!(response.text.as_deref(), Some("Let me check."));
        assert_eq!(response.function_calls.len(), 1);
        assert_eq!(response.function_calls[0].name, "getProducts");
    }

    #[test]
    fn blocked_prompt_yields_empty_response() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let response = GenerateResponse::from(parsed);
        assert_eq!(response.non_empty_text(), None);
        assert!(response.function_calls.is_empty());
    }
}
