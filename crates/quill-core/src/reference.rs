// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bibliographic reference record exchanged with remote stores and search APIs.

use serde::{Deserialize, Serialize};

/// A bibliographic record.
///
/// The same shape is used for locally held references, Zotero items and
/// search results. Reconciliation never mutates a `Reference` in place;
/// merges produce new records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Work title.
    pub title: String,
    /// Author display names in publication order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publication year, when known.
    #[serde(default)]
    pub year: Option<i32>,
    /// Source label: journal, venue, or the API the record came from.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(
        default,
        rename = "abstract",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Formatted in-text citation, e.g. `(Doe, 2023)`.
    #[serde(default)]
    pub citation: String,
    /// Identifier of the record in the remote store (a Zotero item key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
}

impl Reference {
    /// A reference with the three fields every record needs.
    pub fn new(title: impl Into<String>, authors: Vec<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            authors,
            year,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_external_key(mut self, key: impl Into<String>) -> Self {
        self.external_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_caller_json_shape() {
        let json = r#"{
            "title": "Conflicting Paper",
            "authors": ["John Doe"],
            "year": 2023,
            "source": "Journal A",
            "abstract": "An abstract.",
            "externalKey": "ABCD1234"
        }"#;
        let reference: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(reference.title, "Conflicting Paper");
        assert_eq!(reference.year, Some(2023));
        assert_eq!(reference.abstract_text.as_deref(), Some("An abstract."));
        assert_eq!(reference.external_key.as_deref(), Some("ABCD1234"));
        assert!(reference.citation.is_empty());
    }

    #[test]
    fn missing_optional_fields_default() {
        let reference: Reference = serde_json::from_str(r#"{"title": "Bare"}"#).unwrap();
        assert!(reference.authors.is_empty());
        assert_eq!(reference.year, None);
        assert!(reference.doi.is_none());
    }

    #[test]
    fn serialization_omits_absent_optionals() {
        let reference = Reference::new("T", vec!["A".into()], Some(2020)).with_doi("10.1/x");
        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value["doi"], "10.1/x");
        assert!(value.get("abstract").is_none());
        assert!(value.get("externalKey").is_none());
    }
}
