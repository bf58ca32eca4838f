// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost accounting for Quill's provider router.
//!
//! This crate provides:
//! - **Pricing**: model-specific cost calculation from provider-reported tokens
//! - **Rates**: per-task routing rates and the pre-call token estimate
//! - **Budget**: the monthly spending cap with a configurable warning threshold
//! - **Usage**: per-provider cumulative usage records

pub mod budget;
pub mod pricing;
pub mod rates;
pub mod usage;

pub use budget::{BudgetSnapshot, BudgetState};
pub use pricing::{ModelPricing, calculate_cost, get_pricing};
pub use rates::{CostTable, estimate_tokens};
pub use usage::{UsageLedger, UsageRecord};
