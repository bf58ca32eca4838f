// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Quill.

use std::time::Duration;

use thiserror::Error;

/// Classification of a failed provider call.
///
/// The router uses this to decide between failing over to another provider
/// and propagating the failure to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// HTTP 429. `retry_after` carries the provider's hint when present.
    RateLimited { retry_after: Option<Duration> },
    /// HTTP 5xx (including Anthropic's 529 overload status).
    ServerError { status: u16 },
    /// Connection refused, DNS failure, reset mid-body.
    Network,
    /// The HTTP client gave up waiting.
    Timeout,
    /// 2xx response whose body could not be understood.
    MalformedResponse,
    /// HTTP 401/403.
    Unauthorized { status: u16 },
    /// Any other 4xx.
    InvalidRequest { status: u16 },
}

impl ProviderErrorKind {
    /// Classify an HTTP status code from a non-success response.
    pub fn from_status(status: u16, retry_after: Option<Duration>) -> Self {
        match status {
            429 => Self::RateLimited { retry_after },
            401 | 403 => Self::Unauthorized { status },
            500..=599 => Self::ServerError { status },
            _ => Self::InvalidRequest { status },
        }
    }

    /// Whether another provider may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ServerError { .. }
                | Self::Network
                | Self::Timeout
                | Self::MalformedResponse
        )
    }

    /// The provider's retry hint, if it sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Parse a `Retry-After` header given in seconds.
///
/// HTTP-date values are not supported and yield `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

/// One failed provider attempt inside a failover sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    /// Provider identifier.
    pub provider: String,
    /// Error message reported by the provider adapter.
    pub message: String,
    /// Retry hint reported by the provider, if any.
    pub retry_after: Option<Duration>,
}

/// The primary error type used across all Quill crates.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Configuration errors (missing credentials, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A classified failure from a single provider call.
    #[error("provider `{provider}` failed: {message}")]
    Provider {
        provider: String,
        kind: ProviderErrorKind,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No eligible provider before or after failover.
    #[error("AI provider unavailable: {message}")]
    ProviderUnavailable {
        message: String,
        attempts: Vec<FailedAttempt>,
    },

    /// The monthly budget is the only thing blocking every healthy provider.
    #[error("budget exceeded: {message}")]
    BudgetExceeded { message: String },

    /// A provider rejected the request in a way no other provider would fix.
    #[error("provider `{provider}` rejected the request: {message}")]
    ProviderCallFailed {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// A remote bibliographic store call failed.
    #[error("remote store error: {message}")]
    RemoteStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote store could not be reached at all.
    #[error("{message} - operating in offline mode")]
    RemoteStoreUnreachable { message: String },

    /// Exporting one reference to the remote store failed.
    #[error("failed to create `{title}` on remote store: {message}")]
    RemoteCreateFailed { title: String, message: String },

    /// An academic search source failed.
    #[error("search source `{source_name}` failed: {message}")]
    Search {
        source_name: String,
        message: String,
    },

    /// Caller supplied input that cannot be processed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Build a classified provider error without an underlying source.
    pub fn provider(
        provider: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Build a remote store error without an underlying source.
    pub fn remote_store(message: impl Into<String>) -> Self {
        Self::RemoteStore {
            message: message.into(),
            source: None,
        }
    }

    /// True for both "no eligible provider" and its budget-only sub-case.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::BudgetExceeded { .. }
        )
    }

    /// True when a provider call failed in a way another provider may not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { kind, .. } => kind.is_retryable(),
            _ => false,
        }
    }

    /// The bare message without the variant prefix, for caller-facing strings.
    pub fn detail(&self) -> String {
        match self {
            Self::Provider { message, .. }
            | Self::ProviderUnavailable { message, .. }
            | Self::BudgetExceeded { message }
            | Self::ProviderCallFailed { message, .. }
            | Self::RemoteStore { message, .. }
            | Self::RemoteStoreUnreachable { message }
            | Self::RemoteCreateFailed { message, .. }
            | Self::Search { message, .. } => message.clone(),
            Self::Config(message) | Self::InvalidInput(message) | Self::Internal(message) => {
                message.clone()
            }
        }
    }
}
