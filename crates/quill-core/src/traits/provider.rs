// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM provider integrations (Anthropic, OpenAI).

use async_trait::async_trait;

use crate::error::QuillError;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a text-generation provider.
///
/// Adapters perform exactly one HTTP call per `complete` and never retry
/// internally. Failures must be reported as [`QuillError::Provider`] with a
/// classified kind so the router can decide whether to fail over.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable provider identifier, e.g. `"anthropic"`.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, QuillError>;
}
