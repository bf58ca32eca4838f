// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Academic search source trait.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::reference::Reference;

/// A literature search backend such as Semantic Scholar or CrossRef.
#[async_trait]
pub trait SearchSource: Send + Sync {
    fn name(&self) -> &str;

    /// Return at most `limit` references matching `query`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Reference>, QuillError>;
}
