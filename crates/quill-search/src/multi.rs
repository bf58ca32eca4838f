// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent search across every enabled source.

use std::sync::Arc;

use futures::future::join_all;
use quill_config::model::SearchConfig;
use quill_core::{QuillError, Reference, SearchSource};
use quill_reconcile::dedupe_and_rank;
use serde::Serialize;
use tracing::{info, warn};

use crate::arxiv::{self, ArxivSource};
use crate::crossref::{self, CrossRefSource};
use crate::semantic_scholar::{self, SemanticScholarSource};

/// Deduplicated, ranked results plus the sources that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<String>,
}

/// Fans a query out to several [`SearchSource`]s.
pub struct MultiSourceSearch {
    sources: Vec<Arc<dyn SearchSource>>,
    max_results: usize,
}

impl MultiSourceSearch {
    pub fn new(sources: Vec<Arc<dyn SearchSource>>, max_results: usize) -> Self {
        Self {
            sources,
            max_results,
        }
    }

    /// Build the sources named in `[search].sources`.
    pub fn from_config(config: &SearchConfig) -> Result<Self, QuillError> {
        let mut sources: Vec<Arc<dyn SearchSource>> = Vec::new();
        for name in &config.sources {
            match name.as_str() {
                semantic_scholar::SOURCE => {
                    sources.push(Arc::new(SemanticScholarSource::new(config)?));
                }
                crossref::SOURCE => sources.push(Arc::new(CrossRefSource::new(config)?)),
                arxiv::SOURCE => sources.push(Arc::new(ArxivSource::new(config)?)),
                other => {
                    return Err(QuillError::Config(format!(
                        "unknown search source `{other}`"
                    )));
                }
            }
        }
        Ok(Self::new(sources, config.max_results))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Search every source concurrently.
    ///
    /// A failing source is logged and reported in `failed_sources`; the
    /// call fails only when every source failed.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, QuillError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QuillError::InvalidInput("search query is empty".to_string()));
        }
        if self.sources.is_empty() {
            return Err(QuillError::Config("no search sources enabled".to_string()));
        }

        let calls = self
            .sources
            .iter()
            .map(|source| source.search(query, self.max_results));
        let responses = join_all(calls).await;

        let mut collected = Vec::new();
        let mut failed_sources = Vec::new();
        let mut errors = Vec::new();
        for (source, response) in self.sources.iter().zip(responses) {
            match response {
                Ok(results) => collected.extend(results),
                Err(err) => {
                    warn!(source = source.name(), error = %err, "search source failed, skipping");
                    failed_sources.push(source.name().to_string());
                    errors.push(err.to_string());
                }
            }
        }

        if failed_sources.len() == self.sources.len() {
            return Err(QuillError::Search {
                source_name: failed_sources.join(", "),
                message: errors.join("; "),
            });
        }

        let fetched = collected.len();
        let mut results = dedupe_and_rank(collected);
        results.truncate(self.max_results);
        info!(query, fetched, returned = results.len(), "literature search complete");

        Ok(SearchOutcome {
            results,
            failed_sources,
        })
    }
}
