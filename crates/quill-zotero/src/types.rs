// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zotero Web API v3 item JSON and its mapping to [`Reference`].

use std::collections::HashMap;
use std::sync::LazyLock;

use quill_core::Reference;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is valid"));

/// Item types that are not bibliographic records.
const SKIPPED_ITEM_TYPES: &[&str] = &["attachment", "note", "annotation"];

/// Item type used for references created from Quill.
const DEFAULT_ITEM_TYPE: &str = "journalArticle";

/// One entry of `GET /items`.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoteroItem {
    pub key: String,
    pub version: u64,
    pub data: ItemData,
}

impl ZoteroItem {
    pub fn is_bibliographic(&self) -> bool {
        !SKIPPED_ITEM_TYPES.contains(&self.data.item_type.as_str())
    }
}

/// The editable `data` object of an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub publication_title: String,
    #[serde(rename = "DOI", default, skip_serializing_if = "String::is_empty")]
    pub doi: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub abstract_note: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// A creator is either split (`firstName`/`lastName`) or single-field (`name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Creator {
    /// `"First Last"`, or the single-field name.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.trim().to_string();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Split a display name into Zotero's two-field form.
    ///
    /// `"Doe, Jane"` and `"Jane Doe"` both become first `Jane`, last `Doe`;
    /// a single word is kept as a single-field name.
    pub fn author(display: &str) -> Self {
        let display = display.trim();
        let (first, last) = match display.split_once(',') {
            Some((last, first)) => (first.trim(), last.trim()),
            None => match display.rsplit_once(' ') {
                Some((first, last)) => (first.trim(), last.trim()),
                None => {
                    return Self {
                        creator_type: "author".to_string(),
                        name: Some(display.to_string()),
                        ..Self::default()
                    };
                }
            },
        };
        Self {
            creator_type: "author".to_string(),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            name: None,
        }
    }
}

/// Response body of `POST /items`, keyed by the index in the request array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteResponse {
    #[serde(default)]
    pub success: HashMap<String, String>,
    #[serde(default)]
    pub unchanged: HashMap<String, String>,
    #[serde(default)]
    pub failed: HashMap<String, FailedWrite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FailedWrite {
    pub code: u16,
    pub message: String,
}

/// Map an item to a reference. Citation is left empty for the reconciler.
pub fn to_reference(item: &ZoteroItem) -> Reference {
    let data = &item.data;
    Reference {
        title: data.title.clone(),
        authors: data
            .creators
            .iter()
            .map(Creator::display_name)
            .filter(|n| !n.is_empty())
            .collect(),
        year: parse_year(&data.date),
        source: data.publication_title.clone(),
        doi: non_empty(&data.doi),
        abstract_text: non_empty(&data.abstract_note),
        url: non_empty(&data.url),
        citation: String::new(),
        external_key: Some(item.key.clone()),
    }
}

/// Map a reference to item data for create or update.
pub fn to_item_data(reference: &Reference) -> ItemData {
    ItemData {
        item_type: DEFAULT_ITEM_TYPE.to_string(),
        title: reference.title.clone(),
        creators: reference.authors.iter().map(|a| Creator::author(a)).collect(),
        date: reference.year.map(|y| y.to_string()).unwrap_or_default(),
        publication_title: reference.source.clone(),
        doi: reference.doi.clone().unwrap_or_default(),
        abstract_note: reference.abstract_text.clone().unwrap_or_default(),
        url: reference.url.clone().unwrap_or_default(),
    }
}

/// First four-digit group in a free-form Zotero date.
pub fn parse_year(date: &str) -> Option<i32> {
    YEAR.captures(date)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_maps_to_reference() {
        let json = r#"{
            "key": "ABCD2345",
            "version": 1203,
            "library": {"type": "user", "id": 475425},
            "data": {
                "key": "ABCD2345",
                "version": 1203,
                "itemType": "journalArticle",
                "title": "Deep Learning",
                "creators": [
                    {"creatorType": "author", "firstName": "Yann", "lastName": "LeCun"},
                    {"creatorType": "author", "name": "OpenAI"}
                ],
                "date": "May 27, 2015",
                "publicationTitle": "Nature",
                "DOI": "10.1038/nature14539",
                "abstractNote": "",
                "tags": []
            }
        }"#;
        let item: ZoteroItem = serde_json::from_str(json).unwrap();
        let reference = to_reference(&item);

        assert_eq!(reference.authors, ["Yann LeCun", "OpenAI"]);
        assert_eq!(reference.year, Some(2015));
        assert_eq!(reference.source, "Nature");
        assert_eq!(reference.doi.as_deref(), Some("10.1038/nature14539"));
        assert!(reference.abstract_text.is_none());
        assert_eq!(reference.external_key.as_deref(), Some("ABCD2345"));
    }

    #[test]
    fn dates_in_various_shapes() {
        assert_eq!(parse_year("2019-03-01"), Some(2019));
        assert_eq!(parse_year("Spring 2020"), Some(2020));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("n.d."), None);
    }

    #[test]
    fn creator_name_splitting() {
        let inverted = Creator::author("Doe, Jane");
        assert_eq!(inverted.first_name.as_deref(), Some("Jane"));
        assert_eq!(inverted.last_name.as_deref(), Some("Doe"));

        let plain = Creator::author("Jane Q. Doe");
        assert_eq!(plain.first_name.as_deref(), Some("Jane Q."));
        assert_eq!(plain.display_name(), "Jane Q. Doe");

        let single = Creator::author("Plato");
        assert_eq!(single.name.as_deref(), Some("Plato"));
    }

    #[test]
    fn item_data_omits_empty_optionals() {
        let reference = Reference::new("T", vec!["A B".into()], Some(2001)).with_source("J");
        let value = serde_json::to_value(to_item_data(&reference)).unwrap();
        assert_eq!(value["itemType"], "journalArticle");
        assert_eq!(value["date"], "2001");
        assert_eq!(value["publicationTitle"], "J");
        assert!(value.get("DOI").is_none());
        assert_eq!(value["creators"][0]["lastName"], "B");
    }

    #[test]
    fn write_response_with_failure() {
        let json = r#"{
            "successful": {},
            "success": {},
            "unchanged": {},
            "failed": {"0": {"key": "", "code": 400, "message": "Invalid itemType"}}
        }"#;
        let response: WriteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.failed["0"].code, 400);
    }
}
