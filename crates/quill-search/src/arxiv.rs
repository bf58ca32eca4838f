// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! arXiv API search over its Atom feed.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::SearchConfig;
use quill_core::{QuillError, Reference, SearchSource};
use regex::Regex;
use reqwest::Url;
use tracing::debug;

use crate::http::{check_status, search_error};

const API_BASE_URL: &str = "https://export.arxiv.org/api";
pub(crate) const SOURCE: &str = "arxiv";

/// Matches `<tag ...>text</tag>`, capturing the text.
fn element(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>"))
        .expect("element pattern is valid")
}

static ENTRY: LazyLock<Regex> = LazyLock::new(|| element("entry"));
static ID: LazyLock<Regex> = LazyLock::new(|| element("id"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| element("title"));
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| element("summary"));
static PUBLISHED: LazyLock<Regex> = LazyLock::new(|| element("published"));
static NAME: LazyLock<Regex> = LazyLock::new(|| element("name"));
static DOI: LazyLock<Regex> = LazyLock::new(|| element("arxiv:doi"));
static JOURNAL_REF: LazyLock<Regex> = LazyLock::new(|| element("arxiv:journal_ref"));

fn first(pattern: &Regex, xml: &str) -> Option<String> {
    pattern
        .captures(xml)
        .map(|c| clean_text(&c[1]))
        .filter(|t| !t.is_empty())
}

/// Collapse whitespace and decode the predefined XML entities.
fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// One `<entry>` of the feed; `None` for error entries and untitled ones.
fn parse_entry(entry: &str) -> Option<Reference> {
    let id = first(&ID, entry);
    if id.as_deref().is_some_and(|id| id.contains("/api/errors")) {
        return None;
    }
    let title = first(&TITLE, entry)?;
    let year = first(&PUBLISHED, entry).and_then(|p| p.get(..4)?.parse().ok());

    Some(Reference {
        title,
        authors: NAME
            .captures_iter(entry)
            .map(|c| clean_text(&c[1]))
            .filter(|n| !n.is_empty())
            .collect(),
        year,
        source: first(&JOURNAL_REF, entry).unwrap_or_else(|| "arXiv".to_string()),
        doi: first(&DOI, entry),
        abstract_text: first(&SUMMARY, entry),
        url: id,
        ..Reference::default()
    })
}

pub(crate) fn parse_feed(feed: &str) -> Vec<Reference> {
    ENTRY
        .captures_iter(feed)
        .filter_map(|c| parse_entry(&c[1]))
        .collect()
}

/// arXiv full-text query, ranked by relevance.
pub struct ArxivSource {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivSource {
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
        })
    }
}

#[async_trait]
impl SearchSource for ArxivSource {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Reference>, QuillError> {
        let mut url = Url::parse(&format!("{}/query", self.base_url))
            .map_err(|e| search_error(SOURCE, format!("invalid base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("search_query", &format!("all:{query}"))
            .append_pair("start", "0")
            .append_pair("max_results", &limit.to_string())
            .append_pair("sortBy", "relevance");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| search_error(SOURCE, format!("request failed: {e}")))?;
        let response = check_status(SOURCE, response).await?;
        let feed = response
            .text()
            .await
            .map_err(|e| search_error(SOURCE, format!("unreadable response: {e}")))?;

        let mut references = parse_feed(&feed);
        references.truncate(limit);
        debug!(count = references.len(), "arXiv results");
        Ok(references)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models &amp; more.
    </summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <arxiv:doi xmlns:arxiv="http://arxiv.org/schemas/atom">10.48550/arXiv.1706.03762</arxiv:doi>
    <link title="pdf" href="http://arxiv.org/pdf/1706.03762v7" rel="related"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2001.00001v1</id>
    <published>2020-01-01T00:00:00Z</published>
    <title>A Journal Paper</title>
    <author><name>Ann Lee</name></author>
    <arxiv:journal_ref xmlns:arxiv="http://arxiv.org/schemas/atom">Phys. Rev. D 101 (2020)</arxiv:journal_ref>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_not_the_feed_header() {
        let results = parse_feed(FEED);
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.title, "Attention Is All You Need");
        assert_eq!(first.authors, ["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(first.year, Some(2017));
        assert_eq!(first.source, "arXiv");
        assert_eq!(first.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(
            first.abstract_text.as_deref(),
            Some("The dominant sequence transduction models & more.")
        );
        assert_eq!(first.url.as_deref(), Some("http://arxiv.org/abs/1706.03762v7"));

        assert_eq!(results[1].source, "Phys. Rev. D 101 (2020)");
        assert!(results[1].doi.is_none());
    }

    #[test]
    fn error_entry_is_skipped() {
        let feed = r#"<feed><entry>
            <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
            <title>Error</title>
            <summary>incorrect id format for 1234</summary>
        </entry></feed>"#;
        assert!(parse_feed(feed).is_empty());
    }

    #[tokio::test]
    async fn search_queries_all_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("search_query", "all:attention"))
            .and(query_param("max_results", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .expect(1)
            .mount(&server)
            .await;

        let source = ArxivSource::build(&SearchConfig::default(), &server.uri()).unwrap();
        let results = source.search("attention", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Attention Is All You Need");
    }

    #[tokio::test]
    async fn unavailable_service_is_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Rate exceeded."))
            .mount(&server)
            .await;

        let source = ArxivSource::build(&SearchConfig::default(), &server.uri()).unwrap();
        let err = source.search("q", 5).await.unwrap_err();
        assert!(err.to_string().contains("arxiv"), "got: {err}");
        assert!(err.to_string().contains("Rate exceeded"), "got: {err}");
    }
}
