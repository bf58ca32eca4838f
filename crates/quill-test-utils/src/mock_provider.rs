// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted outcomes,
//! so router failover can be exercised without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::{
    ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse, QuillError, TokenUsage,
};

/// One scripted result of a `complete` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply {
        content: String,
        usage: TokenUsage,
        cost_usd: f64,
    },
    Fail {
        kind: ProviderErrorKind,
        message: String,
    },
}

impl MockOutcome {
    /// A reply with 10 input and 20 output tokens.
    pub fn reply(content: impl Into<String>, cost_usd: f64) -> Self {
        Self::Reply {
            content: content.into(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
            cost_usd,
        }
    }

    pub fn fail(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::Fail {
            kind,
            message: message.into(),
        }
    }

    /// HTTP 429 with an optional `Retry-After` hint.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::fail(
            ProviderErrorKind::RateLimited { retry_after },
            "rate limit exceeded",
        )
    }

    pub fn server_error(status: u16) -> Self {
        Self::fail(
            ProviderErrorKind::ServerError { status },
            format!("upstream returned {status}"),
        )
    }

    /// A non-retryable 4xx rejection.
    pub fn rejected(status: u16) -> Self {
        Self::fail(
            ProviderErrorKind::from_status(status, None),
            format!("request rejected with {status}"),
        )
    }
}

/// A mock LLM provider that plays back scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the
/// fallback outcome is returned, a cheap "mock response" reply by default.
pub struct MockProvider {
    name: String,
    outcomes: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    /// A provider that always replies "mock response from {name}".
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let fallback = MockOutcome::reply(format!("mock response from {name}"), 0.0001);
        Self {
            name,
            outcomes: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that plays `outcomes` in order, then the default reply.
    pub fn with_outcomes(name: impl Into<String>, outcomes: Vec<MockOutcome>) -> Self {
        let provider = Self::new(name);
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            ..provider
        }
    }

    /// A provider whose every call ends with `outcome`.
    pub fn always(name: impl Into<String>, outcome: MockOutcome) -> Self {
        Self {
            fallback: outcome,
            ..Self::new(name)
        }
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue another outcome.
    pub async fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of `complete` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, QuillError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match outcome {
            MockOutcome::Reply {
                content,
                usage,
                cost_usd,
            } => Ok(ProviderResponse {
                content,
                model: request.model.unwrap_or_else(|| format!("{}-model", self.name)),
                usage,
                cost_usd,
            }),
            MockOutcome::Fail { kind, message } => {
                Err(QuillError::provider(self.name.clone(), kind, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_core::TaskType;

    use super::*;

    #[tokio::test]
    async fn plays_outcomes_then_fallback() {
        let provider = MockProvider::with_outcomes(
            "mock",
            vec![MockOutcome::rate_limited(None), MockOutcome::reply("scripted", 0.5)],
        );

        let request = ProviderRequest::new("hi", TaskType::General);
        let first = provider.complete(request.clone()).await.unwrap_err();
        assert!(first.is_retryable());

        let second = provider.complete(request.clone()).await.unwrap();
        assert_eq!(second.content, "scripted");

        let third = provider.complete(request).await.unwrap();
        assert_eq!(third.content, "mock response from mock");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockProvider::new("mock");
        provider
            .complete(ProviderRequest::new("outline please", TaskType::Outline))
            .await
            .unwrap();
        let requests = provider.requests().await;
        assert_eq!(requests[0].task_type, TaskType::Outline);
    }
}
