// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for Quill.
//!
//! Talks to any endpoint that speaks the Chat Completions protocol; the
//! base URL comes from `[openai]` in the config.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::OpenAiConfig;
use quill_config::secrets::{OPENAI_API_KEY_ENV, resolve_secret};
use quill_core::{
    ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse, QuillError, TokenUsage,
};
use quill_cost::{calculate_cost, get_pricing};
use tracing::{debug, info, warn};

use crate::client::{OpenAiClient, PROVIDER};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// OpenAI provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
    default_model: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a provider, resolving the key from config or `OPENAI_API_KEY`.
    pub fn new(config: &OpenAiConfig) -> Result<Self, QuillError> {
        let api_key = resolve_secret(
            config.api_key.as_deref(),
            OPENAI_API_KEY_ENV,
            "openai.api_key",
        )?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(model = %config.default_model, base_url = %config.base_url, "OpenAI provider initialized");

        Ok(Self {
            client,
            default_model: config.default_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn to_chat_request(&self, request: &ProviderRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(request.prompt.clone()));

        ChatRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            messages,
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, QuillError> {
        let api_request = self.to_chat_request(&request);
        debug!(model = %api_request.model, task_type = %request.task_type, "sending OpenAI request");
        let response = self.client.chat(&api_request).await?;
        to_provider_response(response)
    }
}

fn to_provider_response(response: ChatResponse) -> Result<ProviderResponse, QuillError> {
    let content = response
        .text()
        .ok_or_else(|| {
            QuillError::provider(
                PROVIDER,
                ProviderErrorKind::MalformedResponse,
                format!("response {} contained no message content", response.id),
            )
        })?
        .to_string();

    let usage = match &response.usage {
        Some(u) => TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        },
        None => {
            warn!(id = %response.id, "response carried no usage block, recording zero tokens");
            TokenUsage::default()
        }
    };
    let cost_usd = calculate_cost(&usage, &get_pricing(&response.model));

    Ok(ProviderResponse {
        content,
        model: response.model,
        usage,
        cost_usd,
    })
}
