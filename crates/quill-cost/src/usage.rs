// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-provider cumulative usage records.

use chrono::{DateTime, Utc};
use quill_core::TokenUsage;
use serde::Serialize;

/// Cumulative usage of one provider since process start or the last reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub provider: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
    pub calls: u64,
    pub failures: u64,
    pub last_call_at: Option<DateTime<Utc>>,
}

impl UsageRecord {
    fn empty(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            cost_usd: 0.0,
            calls: 0,
            failures: 0,
            last_call_at: None,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Usage records for a fixed pool of providers, in pool order.
///
/// A record exists for every provider from construction onwards; records
/// are zeroed by [`UsageLedger::reset`] but never removed.
#[derive(Debug, Clone)]
pub struct UsageLedger {
    records: Vec<UsageRecord>,
}

impl UsageLedger {
    pub fn new<'a>(providers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            records: providers.into_iter().map(UsageRecord::empty).collect(),
        }
    }

    /// Record a completed call. Unknown providers are ignored.
    pub fn record_success(&mut self, provider: &str, usage: &TokenUsage, cost_usd: f64) {
        if let Some(record) = self.get_mut(provider) {
            record.input_tokens += u64::from(usage.input_tokens);
            record.output_tokens += u64::from(usage.output_tokens);
            record.cost_usd += cost_usd;
            record.calls += 1;
            record.last_call_at = Some(Utc::now());
        }
    }

    /// Record a failed call. Failed calls count towards `calls` as well.
    pub fn record_failure(&mut self, provider: &str) {
        if let Some(record) = self.get_mut(provider) {
            record.calls += 1;
            record.failures += 1;
            record.last_call_at = Some(Utc::now());
        }
    }

    pub fn get(&self, provider: &str) -> Option<&UsageRecord> {
        self.records.iter().find(|r| r.provider == provider)
    }

    /// Cumulative call count, 0 for unknown providers.
    pub fn calls(&self, provider: &str) -> u64 {
        self.get(provider).map_or(0, |r| r.calls)
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    /// Zero every record.
    pub fn reset(&mut self) {
        for record in &mut self.records {
            *record = UsageRecord::empty(&record.provider);
        }
    }

    fn get_mut(&mut self, provider: &str) -> Option<&mut UsageRecord> {
        self.records.iter_mut().find(|r| r.provider == provider)
    }
}
