// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini model provider for the Parley support engine.
//!
//! Implements [`ModelProvider`] over the `generateContent` REST endpoint.
//! Tool declarations, function calls and function responses map one to one
//! onto Gemini's `functionDeclarations` / `functionCall` / `functionResponse`.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use parley_config::GeminiConfig;
use parley_core::types::{AdapterType, GenerateRequest, GenerateResponse, HealthStatus};
use parley_core::{ModelProvider, ParleyError, PluginAdapter};
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Build a provider from config.
    ///
    /// API key resolution: `gemini.api_key` if non-empty, then
    /// `GEMINI_API_KEY`, otherwise a config error.
    pub fn new(config: &GeminiConfig) -> Result<Self, ParleyError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;
        info!(model = %config.model, "Gemini provider initialized");
        Ok(Self { client })
    }

    pub fn from_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ParleyError> {
        let wire = GenerateContentRequest::from(&request);
        let response = self.client.generate_content(&wire).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(model = %self.client.model(), reason, "prompt blocked by the model");
        }
        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(reason, "candidate finished");
        }

        Ok(GenerateResponse::from(response))
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, ParleyError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV).map_err(|_| {
        ParleyError::Config(
            "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
        )
    })
}
