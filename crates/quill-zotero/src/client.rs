// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a Zotero user or group library.

use std::time::Duration;

use async_trait::async_trait;
use quill_config::model::ZoteroConfig;
use quill_config::secrets::{ZOTERO_API_KEY_ENV, resolve_secret};
use quill_core::{QuillError, Reference, ReferenceStore};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::types::{WriteResponse, ZoteroItem, to_item_data, to_reference};

/// Zotero caps `limit` at 100.
const PAGE_SIZE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A Zotero library exposed as a [`ReferenceStore`].
#[derive(Debug, Clone)]
pub struct ZoteroStore {
    client: reqwest::Client,
    items_url: String,
}

impl ZoteroStore {
    /// Build a store from `[zotero]`; the key falls back to `ZOTERO_API_KEY`.
    pub fn new(config: &ZoteroConfig) -> Result<Self, QuillError> {
        let library_id = config
            .library_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| QuillError::Config("zotero.library_id is not set".to_string()))?;
        let api_key = resolve_secret(config.api_key.as_deref(), ZOTERO_API_KEY_ENV, "zotero.api_key")?;

        let store = Self::with_key(&api_key, &config.base_url, &config.library_type, library_id)?;
        info!(library_type = %config.library_type, library_id, "Zotero store initialized");
        Ok(store)
    }

    fn with_key(
        api_key: &SecretString,
        base_url: &str,
        library_type: &str,
        library_id: &str,
    ) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| QuillError::Config(format!("invalid Zotero API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("zotero-api-key", key);
        headers.insert("zotero-api-version", HeaderValue::from_static("3"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;

        let prefix = if library_type == "group" { "groups" } else { "users" };
        Ok(Self {
            client,
            items_url: format!(
                "{}/{prefix}/{library_id}/items",
                base_url.trim_end_matches('/')
            ),
        })
    }

    fn page_url(&self, start: usize) -> Result<Url, QuillError> {
        let mut url = Url::parse(&self.items_url)
            .map_err(|e| QuillError::Config(format!("invalid Zotero base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", &PAGE_SIZE.to_string())
            .append_pair("start", &start.to_string());
        Ok(url)
    }

    /// Current version of one item, for conditional writes.
    async fn item_version(&self, key: &str) -> Result<u64, QuillError> {
        let response = self
            .client
            .get(format!("{}/{key}", self.items_url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, "fetch item").await?;
        let item: ZoteroItem = response.json().await.map_err(|e| QuillError::RemoteStore {
            message: format!("unreadable Zotero item {key}: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(item.version)
    }
}

#[async_trait]
impl ReferenceStore for ZoteroStore {
    fn name(&self) -> &str {
        "zotero"
    }

    async fn list(&self) -> Result<Vec<Reference>, QuillError> {
        let mut references = Vec::new();
        let mut start = 0;

        loop {
            let response = self
                .client
                .get(self.page_url(start)?)
                .send()
                .await
                .map_err(transport_error)?;
            let response = check_status(response, "list items").await?;
            let total = response
                .headers()
                .get("total-results")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<usize>().ok());
            let page: Vec<ZoteroItem> =
                response.json().await.map_err(|e| QuillError::RemoteStore {
                    message: format!("unreadable Zotero item list: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let fetched = page.len();
            references.extend(
                page.iter()
                    .filter(|item| item.is_bibliographic())
                    .map(to_reference),
            );
            start += fetched;
            debug!(fetched, start, ?total, "Zotero page received");

            let done = match total {
                Some(total) => start >= total,
                None => fetched < PAGE_SIZE,
            };
            if fetched == 0 || done {
                break;
            }
        }

        info!(count = references.len(), "Zotero library listed");
        Ok(references)
    }

    async fn create(&self, reference: &Reference) -> Result<String, QuillError> {
        let body = [to_item_data(reference)];
        let response = self
            .client
            .post(&self.items_url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, "create item").await?;
        let write: WriteResponse = response.json().await.map_err(|e| QuillError::RemoteStore {
            message: format!("unreadable Zotero write response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if let Some(failed) = write.failed.get("0") {
            return Err(QuillError::remote_store(format!(
                "Zotero rejected item ({}): {}",
                failed.code, failed.message
            )));
        }
        write
            .success
            .get("0")
            .or_else(|| write.unchanged.get("0"))
            .cloned()
            .ok_or_else(|| QuillError::remote_store("Zotero write response carried no item key"))
    }

    async fn update(&self, key: &str, reference: &Reference) -> Result<(), QuillError> {
        let version = self.item_version(key).await?;
        let response = self
            .client
            .patch(format!("{}/{key}", self.items_url))
            .header("if-unmodified-since-version", version.to_string())
            .json(&to_item_data(reference))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            warn!(key, version, "Zotero item changed during update");
            return Err(QuillError::remote_store(format!(
                "item {key} was modified remotely since version {version}"
            )));
        }
        check_status(response, "update item").await?;
        debug!(key, version, "Zotero item updated");
        Ok(())
    }
}

/// Failure to reach Zotero at all.
fn transport_error(e: reqwest::Error) -> QuillError {
    QuillError::RemoteStoreUnreachable {
        message: format!("Zotero request failed: {e}"),
    }
}

async fn check_status(
    response: reqwest::Response,
    action: &str,
) -> Result<reqwest::Response, QuillError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(QuillError::remote_store(format!(
        "Zotero {action} returned {status}: {}",
        body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store(server: &MockServer) -> ZoteroStore {
        ZoteroStore::with_key(
            &SecretString::from("zot-key".to_string()),
            &server.uri(),
            "user",
            "12345",
        )
        .unwrap()
    }

    fn item(key: &str, item_type: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "key": key,
            "version": 7,
            "data": {
                "itemType": item_type,
                "title": title,
                "creators": [{"creatorType": "author", "firstName": "Jane", "lastName": "Roe"}],
                "date": "2021"
            }
        })
    }

    #[test]
    fn missing_library_id_is_config_error() {
        let config = ZoteroConfig {
            api_key: Some("k".into()),
            ..ZoteroConfig::default()
        };
        let err = ZoteroStore::new(&config).unwrap_err();
        assert!(matches!(err, QuillError::Config(_)), "got: {err}");
    }

    #[tokio::test]
    async fn list_pages_and_skips_attachments() {
        let server = MockServer::start().await;
        let first_page: Vec<_> = (0..100)
            .map(|i| {
                if i == 0 {
                    item("ATT00000", "attachment", "scan.pdf")
                } else {
                    item(&format!("K{i:07}"), "journalArticle", &format!("Paper {i}"))
                }
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/users/12345/items"))
            .and(query_param("start", "0"))
            .and(header("zotero-api-key", "zot-key"))
            .and(header("zotero-api-version", "3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Total-Results", "102")
                    .set_body_json(first_page),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/12345/items"))
            .and(query_param("start", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Total-Results", "102")
                    .set_body_json(vec![
                        item("NOTE0001", "note", ""),
                        item("LAST0001", "book", "Last Paper"),
                    ]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let references = store(&server).list().await.unwrap();
        assert_eq!(references.len(), 100);
        assert_eq!(references[0].title, "Paper 1");
        assert_eq!(references[99].external_key.as_deref(), Some("LAST0001"));
        assert_eq!(references[99].authors, ["Jane Roe"]);
    }

    #[tokio::test]
    async fn list_server_error_is_remote_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = store(&server).list().await.unwrap_err();
        assert!(err.to_string().contains("503"), "got: {err}");
    }

    #[tokio::test]
    async fn unreachable_server() {
        let store = ZoteroStore::with_key(
            &SecretString::from("k".to_string()),
            "http://127.0.0.1:9",
            "group",
            "1",
        )
        .unwrap();
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, QuillError::RemoteStoreUnreachable { .. }));
        assert!(err.to_string().ends_with("operating in offline mode"));
    }

    #[tokio::test]
    async fn create_returns_new_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/12345/items"))
            .and(body_partial_json(serde_json::json!([{
                "itemType": "journalArticle",
                "title": "Valid Paper",
                "date": "2023"
            }])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "successful": {"0": {"key": "NEWKEY01"}},
                "success": {"0": "NEWKEY01"},
                "unchanged": {},
                "failed": {}
            })))
            .mount(&server)
            .await;

        let key = store(&server)
            .create(&Reference::new("Valid Paper", vec!["John Doe".into()], Some(2023)))
            .await
            .unwrap();
        assert_eq!(key, "NEWKEY01");
    }

    #[tokio::test]
    async fn create_reports_item_level_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": {},
                "failed": {"0": {"key": "", "code": 413, "message": "Item too large"}}
            })))
            .mount(&server)
            .await;

        let err = store(&server)
            .create(&Reference::new("Big", vec!["A B".into()], Some(2020)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Item too large"), "got: {err}");
    }

    #[tokio::test]
    async fn update_sends_version_precondition() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/12345/items/ZK1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(item("ZK1", "journalArticle", "Old")))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/users/12345/items/ZK1"))
            .and(header("if-unmodified-since-version", "7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .update("ZK1", &Reference::new("New", vec!["Jane Roe".into()], Some(2021)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_version_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(item("ZK1", "journalArticle", "Old")))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(412))
            .mount(&server)
            .await;

        let err = store(&server)
            .update("ZK1", &Reference::new("New", vec![], None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("modified remotely"), "got: {err}");
    }
}
