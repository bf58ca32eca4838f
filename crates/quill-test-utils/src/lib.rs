// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quill.
//!
//! Provides mock adapters for fast, deterministic tests without external
//! services.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted LLM provider
//! - [`MockReferenceStore`] - in-memory remote reference library
//! - [`MockSearchSource`] - canned academic search backend

pub mod mock_provider;
pub mod mock_search;
pub mod mock_store;

pub use mock_provider::{MockOutcome, MockProvider};
pub use mock_search::MockSearchSource;
pub use mock_store::MockReferenceStore;
