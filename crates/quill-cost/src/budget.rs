// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monthly budget tracking.
//!
//! The budget state keeps an in-memory running total for the current UTC
//! month and answers whether a projected call would push it past the
//! configured cap. It emits a `tracing::warn` when recorded spend crosses the
//! warning threshold (80% by default). Totals roll over at the first call
//! observed in a new month.

use chrono::{DateTime, Datelike, Utc};
use quill_config::model::CostConfig;
use serde::Serialize;
use tracing::{info, warn};

/// Monthly spending cap and the amount consumed this period.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// Monthly spending cap (None = unlimited).
    monthly_limit: Option<f64>,
    /// Running total of this month's spend.
    consumed_usd: f64,
    /// Fraction of the cap that triggers a warning.
    warn_threshold: f64,
    /// `(year, month)` the running total belongs to.
    period: (i32, u32),
}

/// Serializable view of the budget, reported alongside usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub monthly_limit_usd: Option<f64>,
    pub consumed_usd: f64,
    pub remaining_usd: Option<f64>,
    /// `YYYY-MM` of the current period.
    pub period: String,
}

impl BudgetState {
    /// Create a budget state with zero spend from configuration.
    pub fn new(config: &CostConfig) -> Self {
        Self::with_limit(config.monthly_budget_usd, config.warn_threshold)
    }

    pub fn with_limit(monthly_limit: Option<f64>, warn_threshold: f64) -> Self {
        Self::starting_at(monthly_limit, warn_threshold, Utc::now())
    }

    fn starting_at(monthly_limit: Option<f64>, warn_threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            monthly_limit,
            consumed_usd: 0.0,
            warn_threshold,
            period: period_of(now),
        }
    }

    /// Whether spending `projected_usd` more would exceed the monthly cap.
    ///
    /// A cap that is already used up refuses every call, including ones with
    /// a zero projected cost.
    pub fn would_exceed(&mut self, projected_usd: f64) -> bool {
        self.would_exceed_at(projected_usd, Utc::now())
    }

    fn would_exceed_at(&mut self, projected_usd: f64, now: DateTime<Utc>) -> bool {
        self.roll_over(now);
        match self.monthly_limit {
            None => false,
            Some(limit) => self.consumed_usd >= limit || self.consumed_usd + projected_usd > limit,
        }
    }

    /// Record the exact cost of a completed call.
    pub fn record_cost(&mut self, cost_usd: f64) {
        self.record_cost_at(cost_usd, Utc::now());
    }

    fn record_cost_at(&mut self, cost_usd: f64, now: DateTime<Utc>) {
        self.roll_over(now);
        let before = self.consumed_usd;
        self.consumed_usd += cost_usd;

        if let Some(limit) = self.monthly_limit {
            let threshold = limit * self.warn_threshold;
            if before < threshold && self.consumed_usd >= threshold {
                warn!(
                    monthly_total = self.consumed_usd,
                    monthly_cap = limit,
                    threshold = self.warn_threshold,
                    "approaching monthly budget cap"
                );
            }
        }
    }

    /// Current monthly spend.
    pub fn consumed(&self) -> f64 {
        self.consumed_usd
    }

    pub fn monthly_limit(&self) -> Option<f64> {
        self.monthly_limit
    }

    /// Budget left this month, `None` when unlimited.
    pub fn remaining(&self) -> Option<f64> {
        self.monthly_limit
            .map(|limit| (limit - self.consumed_usd).max(0.0))
    }

    pub fn snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            monthly_limit_usd: self.monthly_limit,
            consumed_usd: self.consumed_usd,
            remaining_usd: self.remaining(),
            period: format!("{:04}-{:02}", self.period.0, self.period.1),
        }
    }

    /// Reset the running total if `now` is in a later month.
    fn roll_over(&mut self, now: DateTime<Utc>) {
        let period = period_of(now);
        if period != self.period {
            info!(
                previous_total = self.consumed_usd,
                "new budget period, resetting monthly total"
            );
            self.consumed_usd = 0.0;
            self.period = period;
        }
    }
}

fn period_of(now: DateTime<Utc>) -> (i32, u32) {
    (now.year(), now.month())
}
