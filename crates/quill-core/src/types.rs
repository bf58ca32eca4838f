// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by provider adapters and the router.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The workflow step a generation request belongs to.
///
/// Providers price task types differently, so the router ranks them per task.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskType {
    /// Paper outline generation.
    Outline,
    /// Research summarisation and source analysis.
    Research,
    /// Section content drafting.
    Content,
    /// Citation formatting and checking.
    Citation,
    /// Structure guidance for a draft.
    StructureGuidance,
    /// Anything else.
    #[default]
    General,
}

/// Token usage reported by a provider for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Sum of input and output tokens.
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// A single-shot completion request to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// User prompt.
    pub prompt: String,
    /// Optional system prompt.
    pub system_prompt: Option<String>,
    /// Model override; `None` uses the adapter's default model.
    pub model: Option<String>,
    /// Maximum tokens to generate; `None` uses the adapter's default.
    pub max_tokens: Option<u32>,
    /// Workflow step, for logging and pricing.
    pub task_type: TaskType,
}

impl ProviderRequest {
    /// A request with only a prompt and task type set.
    pub fn new(prompt: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            model: None,
            max_tokens: None,
            task_type,
        }
    }
}

/// A completed provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Generated text.
    pub content: String,
    /// Model that produced the text.
    pub model: String,
    /// Tokens consumed.
    pub usage: TokenUsage,
    /// Exact cost of the call in USD.
    pub cost_usd: f64,
}

/// Generated text interpreted either as JSON or as plain prose.
///
/// Consumers that ask a model for structured output fall back to their own
/// formatting when they receive `Unstructured`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationContent {
    Structured { data: serde_json::Value },
    Unstructured { text: String },
}

impl GenerationContent {
    /// Parse model output, accepting bare JSON or a fenced ```json block.
    ///
    /// Only objects and arrays count as structured; a bare JSON string or
    /// number is treated as prose.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let candidate = strip_code_fence(trimmed).unwrap_or(trimmed);

        match serde_json::from_str::<serde_json::Value>(candidate) {
            Ok(value) if value.is_object() || value.is_array() => {
                Self::Structured { data: value }
            }
            _ => Self::Unstructured {
                text: text.to_string(),
            },
        }
    }

    /// True when the content parsed as JSON.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let body = rest.strip_suffix("```")?;
    Some(body.trim())
}
