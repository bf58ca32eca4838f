// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`QuillError`] onto HTTP responses.

use std::time::Duration;

use axum::Json;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use quill_core::{FailedAttempt, QuillError};
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable error class.
    pub kind: &'static str,
    /// Failed provider calls behind a `provider_unavailable` error.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptBody>,
}

#[derive(Debug, Serialize)]
pub struct AttemptBody {
    pub provider: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl From<&FailedAttempt> for AttemptBody {
    fn from(attempt: &FailedAttempt) -> Self {
        Self {
            provider: attempt.provider.clone(),
            message: attempt.message.clone(),
            retry_after_secs: attempt.retry_after.map(whole_secs),
        }
    }
}

/// Seconds, rounded up so a client never retries early.
fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// A [`QuillError`] returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub QuillError);

impl From<QuillError> for ApiError {
    fn from(err: QuillError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            QuillError::BudgetExceeded { .. } => (StatusCode::SERVICE_UNAVAILABLE, "budget_exceeded"),
            QuillError::ProviderUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "provider_unavailable")
            }
            QuillError::ProviderCallFailed { .. } => (StatusCode::BAD_GATEWAY, "provider_call_failed"),
            QuillError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            QuillError::RemoteStoreUnreachable { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "remote_store_unreachable")
            }
            QuillError::RemoteStore { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "remote_store"),
            QuillError::Search { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "search"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::warn!(status = %status, kind, error = %self.0, "request failed");
        }
        let attempts: Vec<AttemptBody> = match &self.0 {
            QuillError::ProviderUnavailable { attempts, .. } => {
                attempts.iter().map(AttemptBody::from).collect()
            }
            _ => Vec::new(),
        };
        let retry_after = attempts.iter().filter_map(|a| a.retry_after_secs).min();

        let mut response = (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                kind,
                attempts,
            }),
        )
            .into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
