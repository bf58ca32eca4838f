// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zotero Web API v3 reference store for Quill.

pub mod client;
pub mod types;

pub use client::ZoteroStore;
