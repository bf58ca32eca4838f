// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for Quill.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::AnthropicConfig;
use quill_config::secrets::{ANTHROPIC_API_KEY_ENV, resolve_secret};
use quill_core::{
    ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse, QuillError, TokenUsage,
};
use quill_cost::{calculate_cost, get_pricing};
use tracing::{debug, info};

use crate::client::{AnthropicClient, PROVIDER};
use crate::types::{ApiMessage, MessageRequest, MessageResponse};

/// Anthropic Claude provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
    default_model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the given configuration.
    pub fn new(config: &AnthropicConfig) -> Result<Self, QuillError> {
        let api_key = resolve_secret(
            config.api_key.as_deref(),
            ANTHROPIC_API_KEY_ENV,
            "anthropic.api_key",
        )?;
        let client = AnthropicClient::new(
            &api_key,
            &config.api_version,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(model = %config.default_model, "Anthropic provider initialized");

        Ok(Self {
            client,
            default_model: config.default_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: AnthropicClient, default_model: &str, max_tokens: u32) -> Self {
        Self {
            client,
            default_model: default_model.to_string(),
            max_tokens,
        }
    }

    /// Converts a [`ProviderRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(&self, request: &ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            messages: vec![ApiMessage::user(request.prompt.clone())],
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, QuillError> {
        let api_request = self.to_message_request(&request);
        debug!(model = %api_request.model, task_type = %request.task_type, "sending Anthropic request");
        let response = self.client.complete_message(&api_request).await?;
        to_provider_response(response)
    }
}

fn to_provider_response(response: MessageResponse) -> Result<ProviderResponse, QuillError> {
    let content = response.text().ok_or_else(|| {
        QuillError::provider(
            PROVIDER,
            ProviderErrorKind::MalformedResponse,
            format!("response {} contained no text content", response.id),
        )
    })?;

    let usage = TokenUsage {
        input_tokens: response.usage.input_tokens,
        output_tokens: response.usage.output_tokens,
    };
    let cost_usd = calculate_cost(&usage, &get_pricing(&response.model));

    Ok(ProviderResponse {
        content,
        model: response.model,
        usage,
        cost_usd,
    })
}
