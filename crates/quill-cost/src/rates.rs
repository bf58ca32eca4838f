// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-task routing rates and the pre-call cost estimate.
//!
//! Rates only rank providers and project spend before a call. The amount
//! charged against the budget is always the provider-reported figure from
//! [`crate::pricing`].

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use quill_core::TaskType;
use tracing::warn;

/// Capability cost table of one provider, in USD per million tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    default_per_mtok: f64,
    per_task: HashMap<TaskType, f64>,
}

impl CostTable {
    /// A table charging the same rate for every task type.
    pub fn flat(default_per_mtok: f64) -> Self {
        Self {
            default_per_mtok,
            per_task: HashMap::new(),
        }
    }

    /// Build a table from a config rate map keyed by task-type name.
    ///
    /// Unknown task names are skipped with a warning; config validation
    /// reports them before this point in normal startup.
    pub fn from_config(default_per_mtok: f64, rates: &BTreeMap<String, f64>) -> Self {
        let mut table = Self::flat(default_per_mtok);
        for (name, rate) in rates {
            match TaskType::from_str(name) {
                Ok(task) => {
                    table.per_task.insert(task, *rate);
                }
                Err(_) => warn!(task = %name, "ignoring rate for unknown task type"),
            }
        }
        table
    }

    /// Override the rate for one task type.
    pub fn with_rate(mut self, task: TaskType, per_mtok: f64) -> Self {
        self.per_task.insert(task, per_mtok);
        self
    }

    /// Rate in USD per million tokens for `task`.
    pub fn rate(&self, task: TaskType) -> f64 {
        self.per_task
            .get(&task)
            .copied()
            .unwrap_or(self.default_per_mtok)
    }

    /// Projected USD cost of sending `prompt` for `task`.
    pub fn projected_cost(&self, prompt: &str, task: TaskType) -> f64 {
        estimate_tokens(prompt) as f64 * self.rate(task) / 1_000_000.0
    }
}

/// Approximate token count of `text`: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn estimate_counts_chars_not_bytes() {
        assert_eq!(estimate_tokens("éééé"), 1);
    }

    #[test]
    fn task_rate_overrides_default() {
        let table = CostTable::flat(3.0).with_rate(TaskType::Outline, 0.5);
        assert!((table.rate(TaskType::Outline) - 0.5).abs() < f64::EPSILON);
        assert!((table.rate(TaskType::Content) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_config_parses_kebab_case_names() {
        let mut rates = BTreeMap::new();
        rates.insert("structure-guidance".to_string(), 1.25);
        rates.insert("not-a-task".to_string(), 9.0);
        let table = CostTable::from_config(2.0, &rates);
        assert!((table.rate(TaskType::StructureGuidance) - 1.25).abs() < f64::EPSILON);
        assert!((table.rate(TaskType::General) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn projected_cost_uses_estimate_and_rate() {
        let table = CostTable::flat(2.0);
        // 4000 chars -> 1000 tokens -> 1000 / 1M * 2.0
        let prompt = "x".repeat(4000);
        let cost = table.projected_cost(&prompt, TaskType::Research);
        assert!((cost - 0.002).abs() < 1e-12);
    }
}
