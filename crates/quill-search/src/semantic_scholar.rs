// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic Scholar Graph API paper search.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::SearchConfig;
use quill_config::secrets::{SEMANTIC_SCHOLAR_API_KEY_ENV, optional_secret};
use quill_core::{QuillError, Reference, SearchSource};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::debug;

use crate::http::{check_status, search_error};

const API_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";
const FIELDS: &str = "title,authors,year,venue,externalIds,abstract,url";
pub(crate) const SOURCE: &str = "semantic_scholar";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    external_ids: Option<ExternalIds>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
}

impl Paper {
    fn into_reference(self) -> Option<Reference> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let venue = self.venue.filter(|v| !v.trim().is_empty());
        Some(Reference {
            title,
            authors: self.authors.into_iter().filter_map(|a| a.name).collect(),
            year: self.year,
            source: venue.unwrap_or_else(|| "Semantic Scholar".to_string()),
            doi: self.external_ids.and_then(|ids| ids.doi),
            abstract_text: self.abstract_text,
            url: self.url,
            ..Reference::default()
        })
    }
}

/// Semantic Scholar paper search. The API key is optional.
pub struct SemanticScholarSource {
    client: reqwest::Client,
    base_url: String,
}

impl SemanticScholarSource {
    pub fn new(config: &SearchConfig) -> Result<Self, QuillError> {
        Self::build(config, API_BASE_URL)
    }

    fn build(config: &SearchConfig, base_url: &str) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = optional_secret(
            config.semantic_scholar_api_key.as_deref(),
            SEMANTIC_SCHOLAR_API_KEY_ENV,
        ) {
            let mut value = HeaderValue::from_str(key.expose_secret()).map_err(|e| {
                QuillError::Config(format!("invalid Semantic Scholar API key header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchSource for SemanticScholarSource {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Reference>, QuillError> {
        let mut url = Url::parse(&format!("{}/paper/search", self.base_url))
            .map_err(|e| search_error(SOURCE, format!("invalid base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", FIELDS);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| search_error(SOURCE, format!("request failed: {e}")))?;
        let response = check_status(SOURCE, response).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| search_error(SOURCE, format!("unreadable response: {e}")))?;

        let references: Vec<Reference> = body
            .data
            .into_iter()
            .filter_map(Paper::into_reference)
            .take(limit)
            .collect();
        debug!(count = references.len(), "Semantic Scholar results");
        Ok(references)
    }
}
