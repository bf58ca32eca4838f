// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost calculation.
//!
//! Anthropic: <https://docs.anthropic.com/en/docs/about-claude/pricing>
//! OpenAI: <https://openai.com/api/pricing>
//!
//! Claude Haiku:   input=$0.80/MTok, output=$4.00/MTok
//! Claude Sonnet:  input=$3.00/MTok, output=$15.00/MTok
//! Claude Opus:    input=$15.00/MTok, output=$75.00/MTok
//! GPT-4o mini:    input=$0.15/MTok, output=$0.60/MTok
//! GPT-4o:         input=$2.50/MTok, output=$10.00/MTok
//! GPT-4.1:        input=$2.00/MTok, output=$8.00/MTok

use quill_core::TokenUsage;

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// Cost per million input tokens.
    pub input_per_mtok: f64,
    /// Cost per million output tokens.
    pub output_per_mtok: f64,
}

impl ModelPricing {
    const fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }
}

/// Look up pricing for a given model identifier.
///
/// Matches on substrings. Falls back to Sonnet pricing for unknown models so
/// a misnamed model is never recorded as free.
pub fn get_pricing(model: &str) -> ModelPricing {
    let lower = model.to_lowercase();

    if lower.contains("opus") {
        ModelPricing::new(15.0, 75.0)
    } else if lower.contains("haiku") {
        ModelPricing::new(0.80, 4.0)
    } else if lower.contains("gpt-4o-mini") {
        ModelPricing::new(0.15, 0.60)
    } else if lower.contains("gpt-4o") {
        ModelPricing::new(2.50, 10.0)
    } else if lower.contains("gpt-4.1") {
        ModelPricing::new(2.0, 8.0)
    } else {
        ModelPricing::new(3.0, 15.0)
    }
}

/// Calculate cost in USD for a given token usage and pricing.
pub fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let input = (f64::from(usage.input_tokens) / 1_000_000.0) * pricing.input_per_mtok;
    let output = (f64::from(usage.output_tokens) / 1_000_000.0) * pricing.output_per_mtok;
    input + output
}
