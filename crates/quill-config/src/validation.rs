// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-negative rates, known task types in rate tables, and ranges.

use std::collections::BTreeMap;
use std::str::FromStr;

use quill_core::TaskType;
use strum::IntoEnumIterator;

use crate::diagnostic::{ConfigError, suggest_key};
use crate::model::{KNOWN_SEARCH_SOURCES, QuillConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QuillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(validation("server.host must not be empty"));
    }

    if config.server.port == 0 {
        errors.push(validation("server.port must be greater than 0"));
    }

    validate_rates(
        "anthropic",
        config.anthropic.default_rate_per_mtok,
        &config.anthropic.rates,
        &mut errors,
    );
    validate_rates(
        "openai",
        config.openai.default_rate_per_mtok,
        &config.openai.rates,
        &mut errors,
    );

    if config.openai.base_url.trim().is_empty() {
        errors.push(validation("openai.base_url must not be empty"));
    }

    if let Some(monthly) = config.cost.monthly_budget_usd {
        if monthly < 0.0 {
            errors.push(validation(format!(
                "cost.monthly_budget_usd must be non-negative, got {monthly}"
            )));
        }
    }

    let threshold = config.cost.warn_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        errors.push(validation(format!(
            "cost.warn_threshold must be in (0, 1], got {threshold}"
        )));
    }

    if !matches!(config.zotero.library_type.as_str(), "user" | "group") {
        errors.push(validation(format!(
            "zotero.library_type must be `user` or `group`, got `{}`",
            config.zotero.library_type
        )));
    }

    if !(1..=100).contains(&config.search.max_results) {
        errors.push(validation(format!(
            "search.max_results must be between 1 and 100, got {}",
            config.search.max_results
        )));
    }

    for source in &config.search.sources {
        if !KNOWN_SEARCH_SOURCES.contains(&source.as_str()) {
            errors.push(unknown_name("search.sources", source, KNOWN_SEARCH_SOURCES));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rates(
    section: &str,
    default_rate: f64,
    rates: &BTreeMap<String, f64>,
    errors: &mut Vec<ConfigError>,
) {
    if default_rate < 0.0 {
        errors.push(validation(format!(
            "{section}.default_rate_per_mtok must be non-negative, got {default_rate}"
        )));
    }

    let task_names: Vec<String> = TaskType::iter().map(|t| t.to_string()).collect();
    let task_refs: Vec<&str> = task_names.iter().map(String::as_str).collect();

    for (task, rate) in rates {
        if TaskType::from_str(task).is_err() {
            errors.push(unknown_name(&format!("{section}.rates"), task, &task_refs));
        }
        if *rate < 0.0 {
            errors.push(validation(format!(
                "{section}.rates.{task} must be non-negative, got {rate}"
            )));
        }
    }
}

fn unknown_name(field: &str, name: &str, valid: &[&str]) -> ConfigError {
    let message = match suggest_key(name, valid) {
        Some(s) => format!("{field} contains unknown entry `{name}`; did you mean `{s}`?"),
        None => format!(
            "{field} contains unknown entry `{name}`; expected one of: {}",
            valid.join(", ")
        ),
    };
    validation(message)
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
