// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CrossRef REST API works search.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::SearchConfig;
use quill_core::{QuillError, Reference, SearchSource};
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::http::{check_status, search_error};

const API_BASE_URL: &str = "https://api.crossref.org";
pub(crate) const SOURCE: &str = "crossref";

/// CrossRef abstracts are JATS XML fragments.
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(Debug, Deserialize)]
struct WorksMessage {
    #[serde(default)]
    items: Vec<Work>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Work {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<Contributor>,
    #[serde(default)]
    container_title: Vec<String>,
    #[serde(default)]
    issued: Option<DateParts>,
    #[serde(default)]
    published: Option<DateParts>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl Contributor {
    fn display_name(&self) -> Option<String> {
        match (&self.given, &self.family, &self.name) {
            (Some(given), Some(family), _) => Some(format!("{given} {family}")),
            (None, Some(family), _) => Some(family.clone()),
            (_, None, Some(name)) => Some(name.clone()),
            _ => None,
        }
    }
}

/// `{"date-parts": [[2020, 5, 1]]}`; the year may be `null`.
#[derive(Debug, Deserialize)]
struct DateParts {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

impl Work {
    fn into_reference(self) -> Option<Reference> {
        let title = self.title.into_iter().find(|t| !t.trim().is_empty())?;
        let year = self
            .issued
            .as_ref()
            .and_then(DateParts::year)
            .or_else(|| self.published.as_ref().and_then(DateParts::year));
        Some(Reference {
            title,
            authors: self
                .author
                .iter()
                .filter_map(Contributor::display_name)
                .collect(),
            year,
            source: self
                .container_title
                .into_iter()
                .next()
                .unwrap_or_else(|| "CrossRef".to_string()),
            doi: self.doi,
            abstract_text: self.abstract_text.map(|a| strip_markup(&a)),
            url: self.url,
            ..Reference::default()
        })
    }
}

fn strip_markup(text: &str) -> String {
    MARKUP
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// CrossRef works search. A `mailto` puts requests in the polite pool.
pub struct CrossRefSource {
    client: reqwest::Client,
    base_url: String,
    mailto: Option<String>,
}

impl CrossRefSource {
    pub fn new(config: &SearchConfig) -> Result<Self, QuillError> {
        Self::build(config, API_BASE_URL)
    }

    fn build(config: &SearchConfig, base_url: &str) -> Result<Self, QuillError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mailto: config.crossref_mailto.clone(),
        })
    }
}

#[async_trait]
impl SearchSource for CrossRefSource {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Reference>, QuillError> {
        let mut url = Url::parse(&format!("{}/works", self.base_url))
            .map_err(|e| search_error(SOURCE, format!("invalid base URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query.bibliographic", query)
                .append_pair("rows", &limit.to_string());
            if let Some(mailto) = &self.mailto {
                pairs.append_pair("mailto", mailto);
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| search_error(SOURCE, format!("request failed: {e}")))?;
        let response = check_status(SOURCE, response).await?;
        let body: WorksResponse = response
            .json()
            .await
            .map_err(|e| search_error(SOURCE, format!("unreadable response: {e}")))?;

        let references: Vec<Reference> = body
            .message
            .items
            .into_iter()
            .filter_map(Work::into_reference)
            .take(limit)
            .collect();
        debug!(count = references.len(), "CrossRef results");
        Ok(references)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn maps_works() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .and(query_param("query.bibliographic", "deep learning"))
            .and(query_param("rows", "2"))
            .and(query_param("mailto", "team@example.org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "message-type": "work-list",
                "message": {
                    "items": [
                        {
                            "DOI": "10.1038/nature14539",
                            "title": ["Deep learning"],
                            "author": [
                                {"given": "Yann", "family": "LeCun", "sequence": "first"},
                                {"name": "Deep Learning Consortium"}
                            ],
                            "container-title": ["Nature"],
                            "issued": {"date-parts": [[2015, 5, 27]]},
                            "abstract": "<jats:p>Deep learning allows\n models.</jats:p>",
                            "URL": "https://doi.org/10.1038/nature14539"
                        },
                        {
                            "DOI": "10.1/undated",
                            "title": ["Undated Work"],
                            "issued": {"date-parts": [[null]]}
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let config = SearchConfig {
            crossref_mailto: Some("team@example.org".into()),
            ..SearchConfig::default()
        };
        let source = CrossRefSource::build(&config, &server.uri()).unwrap();
        let results = source.search("deep learning", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].authors, ["Yann LeCun", "Deep Learning Consortium"]);
        assert_eq!(results[0].year, Some(2015));
        assert_eq!(results[0].source, "Nature");
        assert_eq!(
            results[0].abstract_text.as_deref(),
            Some("Deep learning allows models.")
        );
        assert_eq!(results[1].year, None);
        assert_eq!(results[1].source, "CrossRef");
    }

    #[tokio::test]
    async fn server_error_is_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = CrossRefSource::build(&SearchConfig::default(), &server.uri()).unwrap();
        let err = source.search("q", 2).await.unwrap_err();
        assert!(err.to_string().contains("crossref"), "got: {err}");
    }
}
