// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-provider AI routing for Quill.
//!
//! This crate provides:
//! - [`AiRouter`]: cost-ranked provider selection with failover, cool-downs,
//!   per-provider usage accounting, and a monthly budget
//! - [`Availability`]: the health state the router tracks per provider
//!
//! The router owns all mutable routing state. Callers construct one instance
//! at startup and share it behind an `Arc`.

pub mod availability;
pub mod router;

pub use availability::Availability;
pub use router::{
    AiRouter, GenerationRequest, GenerationResult, GenerationUsage, ProviderSlot, ProviderStatus,
    UsageSnapshot,
};
