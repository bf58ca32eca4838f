// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! Provides [`AnthropicClient`] which handles request construction,
//! authentication, and classification of failed calls. The client makes
//! exactly one attempt per call; failover between providers is the router's job.

use std::time::Duration;

use quill_core::{ProviderErrorKind, QuillError, parse_retry_after};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

/// Base URL for the Anthropic Messages API.
const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

pub(crate) const PROVIDER: &str = "anthropic";

/// HTTP client for Anthropic API communication.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic API client.
    ///
    /// # Arguments
    /// * `api_key` - Anthropic API key for authentication
    /// * `api_version` - API version string (e.g., "2023-06-01")
    /// * `timeout` - Whole-request timeout
    pub fn new(
        api_key: &SecretString,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| QuillError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                QuillError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a non-streaming request and returns the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, QuillError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        if status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return serde_json::from_str(&body).map_err(|e| QuillError::Provider {
                provider: PROVIDER.to_string(),
                kind: ProviderErrorKind::MalformedResponse,
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            });
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Anthropic API error ({}): {}",
                api_err.error.type_, api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };

        Err(QuillError::provider(
            PROVIDER,
            ProviderErrorKind::from_status(status.as_u16(), retry_after),
            message,
        ))
    }
}

/// Classify a transport-level failure.
fn transport_error(e: reqwest::Error) -> QuillError {
    let kind = if e.is_timeout() {
        ProviderErrorKind::Timeout
    } else if e.is_decode() {
        ProviderErrorKind::MalformedResponse
    } else {
        ProviderErrorKind::Network
    };
    QuillError::Provider {
        provider: PROVIDER.to_string(),
        kind,
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}
