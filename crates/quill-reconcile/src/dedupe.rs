// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge duplicate search results and rank them.

use std::cmp::Reverse;

use quill_core::Reference;

use crate::citation::with_citation;
use crate::similarity::is_same_work;

/// Collapse results that describe the same work, then rank.
///
/// The first occurrence of a work is kept and missing fields are filled
/// from later duplicates. Ranking is by metadata completeness, then by
/// year (newest first, unknown last); equal ranks keep input order.
pub fn dedupe_and_rank(results: Vec<Reference>) -> Vec<Reference> {
    let mut unique: Vec<Reference> = Vec::with_capacity(results.len());
    for result in results {
        match unique.iter_mut().find(|kept| is_same_work(kept, &result)) {
            Some(kept) => fill_missing(kept, result),
            None => unique.push(result),
        }
    }

    unique.sort_by_key(|r| (Reverse(completeness(r)), Reverse(r.year)));
    unique.into_iter().map(with_citation).collect()
}

fn fill_missing(kept: &mut Reference, other: Reference) {
    if kept.authors.is_empty() {
        kept.authors = other.authors;
    }
    if kept.year.is_none() {
        kept.year = other.year;
    }
    if kept.source.trim().is_empty() {
        kept.source = other.source;
    }
    kept.doi = kept.doi.take().or(other.doi);
    kept.abstract_text = kept.abstract_text.take().or(other.abstract_text);
    kept.url = kept.url.take().or(other.url);
}

/// Number of populated metadata fields.
fn completeness(r: &Reference) -> u8 {
    [
        !r.authors.is_empty(),
        r.year.is_some(),
        !r.source.trim().is_empty(),
        r.doi.is_some(),
        r.abstract_text.is_some(),
        r.url.is_some(),
    ]
    .into_iter()
    .map(u8::from)
    .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_merge_missing_fields() {
        let semantic = Reference::new(
            "Attention Is All You Need",
            vec!["Ashish Vaswani".into()],
            Some(2017),
        )
        .with_source("Semantic Scholar");
        let crossref = Reference::new(
            "Attention is all you need.",
            vec!["Vaswani, A.".into()],
            Some(2017),
        )
        .with_source("CrossRef")
        .with_doi("10.5555/3295222.3295349");

        let merged = dedupe_and_rank(vec![semantic, crossref]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "Semantic Scholar");
        assert_eq!(merged[0].doi.as_deref(), Some("10.5555/3295222.3295349"));
        assert_eq!(merged[0].citation, "(Vaswani, 2017)");
    }

    #[test]
    fn ranks_by_completeness_then_recency() {
        let sparse = Reference::new("Sparse Paper", vec![], None);
        let old = Reference::new("Old Paper", vec!["A. Old".into()], Some(1999))
            .with_doi("10.1/old");
        let new = Reference::new("New Paper", vec!["B. New".into()], Some(2024))
            .with_doi("10.1/new");

        let ranked = dedupe_and_rank(vec![sparse, old, new]);
        let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["New Paper", "Old Paper", "Sparse Paper"]);
    }

    #[test]
    fn empty_input() {
        assert!(dedupe_and_rank(Vec::new()).is_empty());
    }
}
