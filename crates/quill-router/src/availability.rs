// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider availability tracking.

use tokio::time::Instant;

/// Health state of one provider in the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Healthy,
    /// Out of rotation until `until` after a retryable failure.
    CoolingDown { until: Instant, reason: String },
    /// Taken out of rotation by an operator.
    Disabled,
}

impl Availability {
    /// Clear a cool-down whose window has passed.
    pub fn refresh(&mut self, now: Instant) {
        if let Self::CoolingDown { until, .. } = self {
            if *until <= now {
                *self = Self::Healthy;
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Short label for status reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::CoolingDown { .. } => "cooling_down",
            Self::Disabled => "disabled",
        }
    }

    /// Whole seconds left in a cool-down, rounded up.
    pub fn cooldown_remaining_secs(&self, now: Instant) -> Option<u64> {
        match self {
            Self::CoolingDown { until, .. } => {
                let left = until.saturating_duration_since(now);
                Some(left.as_secs() + u64::from(left.subsec_nanos() > 0))
            }
            _ => None,
        }
    }
}
