// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.

use std::time::Duration;

use quill_core::{ProviderErrorKind, QuillError, parse_retry_after};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

pub(crate) const PROVIDER: &str = "openai";

/// HTTP client for OpenAI-compatible endpoints.
///
/// `base_url` points at the API root (`https://api.openai.com/v1`); the
/// client appends `/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| QuillError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Sends one chat completion request. No retries.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, QuillError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "chat completion response received");

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
                "OpenAI API error ({}): {}",
                api_err.error.type_.as_deref().unwrap_or("unknown"),
                api_err.error.message
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(
            &SecretString::from("sk-test".to_string()),
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn test_request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".into(),
            messages: vec![ChatMessage::user("Hello")],
            max_tokens: 256,
        }
    }

    #[tokio::test]
    async fn posts_to_chat_completions_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o",
                "choices": [{"message": {"role": "assistant", "content": "Hi"}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Trailing slash is tolerated.
        let client = test_client(&format!("{}/v1/", server.uri()));
        let response = client.chat(&test_request()).await.unwrap();
        assert_eq!(response.text(), Some("Hi"));
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(serde_json::json!({
                        "error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}
                    })),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).chat(&test_request()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Rate limit reached"), "got: {err}");
        match err {
            QuillError::Provider { kind, .. } => assert_eq!(
                kind,
                ProviderErrorKind::RateLimited {
                    retry_after: Some(Duration::from_secs(7))
                }
            ),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).chat(&test_request()).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn plain_text_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).chat(&test_request()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("bad gateway"), "got: {err}");
    }
}
