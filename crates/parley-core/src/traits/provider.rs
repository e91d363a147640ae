// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model provider trait for generative-model integrations.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerateRequest, GenerateResponse};

/// Adapter for the generative model.
///
/// The engine treats the model as a black box:
/// `generate(contents, systemInstruction, tools | responseSchema) -> (text, functionCalls)`.
/// Implementations must not retry a request once the model may have produced
/// output; timeouts surface as [`ParleyError::Timeout`].
#[async_trait]
pub trait ModelProvider: PluginAdapter {
    /// Sends a request and returns the full (non-streamed) response.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ParleyError>;
}
