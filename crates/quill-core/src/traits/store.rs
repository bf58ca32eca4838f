// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote reference store trait (Zotero and friends).

use async_trait::async_trait;

use crate::error::QuillError;
use crate::reference::Reference;

/// A remote bibliographic library.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Human-readable store name used in logs.
    fn name(&self) -> &str;

    /// Fetch every reference in the library.
    async fn list(&self) -> Result<Vec<Reference>, QuillError>;

    /// Create a reference and return its remote key.
    async fn create(&self, reference: &Reference) -> Result<String, QuillError>;

    /// Overwrite the remote record identified by `key`.
    async fn update(&self, key: &str, reference: &Reference) -> Result<(), QuillError>;
}
