// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use parley_core::types::{
    AdapterType, FunctionCall, GenerateRequest, GenerateResponse, HealthStatus,
};
use parley_core::{ModelProvider, ParleyError, PluginAdapter};

/// A model provider that replays scripted responses in FIFO order.
///
/// Every request is recorded so tests can assert how many model calls
/// happened and what they contained. An exhausted script is a provider
/// error, which surfaces unexpected extra calls.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<GenerateResponse, String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockProvider {
    /// A provider with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<GenerateResponse>) -> Self {
        let provider = Self::new();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    pub fn push_response(&self, response: GenerateResponse) {
        lock(&self.script).push_back(Ok(response));
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(GenerateResponse::text(text));
    }

    /// Queue a response carrying function calls given as `(name, args)`.
    pub fn push_calls(&self, calls: Vec<(&str, serde_json::Value)>) {
        self.push_response(GenerateResponse::calls(
            calls
                .into_iter()
                .map(|(name, args)| FunctionCall {
                    name: name.to_string(),
                    args,
                })
                .collect(),
        ));
    }

    /// Queue a provider failure.
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ModelProvider for MockProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ParleyError> {
        lock(&self.requests).push(request);
        let next = lock(&self.script).pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ParleyError::Provider {
                message,
                source: None,
            }),
            None => Err(ParleyError::Provider {
                message: "mock provider script exhausted".to_string(),
                source: None,
            }),
        }
    }
}

/// Lock, recovering from poisoning so one failed test cannot cascade.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}
