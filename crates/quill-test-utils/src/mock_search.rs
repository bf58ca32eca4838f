// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned academic search source.

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::{QuillError, Reference, SearchSource};

/// A search source returning fixed results, or failing every call.
pub struct MockSearchSource {
    name: String,
    results: Result<Vec<Reference>, String>,
    queries: Mutex<Vec<String>>,
}

impl MockSearchSource {
    pub fn new(name: impl Into<String>, results: Vec<Reference>) -> Self {
        Self {
            name: name.into(),
            results: Ok(results),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl SearchSource for MockSearchSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Reference>, QuillError> {
        self.queries.lock().await.push(query.to_string());
        match &self.results {
            Ok(results) => Ok(results.iter().take(limit).cloned().collect()),
            Err(message) => Err(QuillError::Search {
                source_name: self.name.clone(),
                message: message.clone(),
            }),
        }
    }
}
