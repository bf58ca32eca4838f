// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every external system Quill talks to sits behind one of these traits so
//! the router, reconciler and search fan-out can be exercised against mocks.

pub mod provider;
pub mod search;
pub mod store;

pub use provider::ProviderAdapter;
pub use search::SearchSource;
pub use store::ReferenceStore;
