// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy "same work" test shared by reconciliation and search dedup.

use quill_core::Reference;

use crate::normalize::{normalize_name, normalize_title};

/// Titles match when equal, one contains the other, or their Levenshtein
/// distance is under 20% of the longer title. Empty titles never match.
pub fn titles_match(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    let longest = a.chars().count().max(b.chars().count());
    strsim::levenshtein(&a, &b) * 5 < longest
}

/// Two author names refer to the same person when equal, one contains the
/// other, or they share a surname token longer than two characters.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }
    match (surname(&a), surname(&b)) {
        (Some(x), Some(y)) => x == y && x.chars().count() > 2,
        _ => false,
    }
}

/// True when any author of `a` matches any author of `b`.
pub fn authors_match(a: &[String], b: &[String]) -> bool {
    a.iter().any(|x| b.iter().any(|y| names_match(x, y)))
}

/// Title and author match together.
pub fn is_same_work(a: &Reference, b: &Reference) -> bool {
    titles_match(&a.title, &b.title) && authors_match(&a.authors, &b.authors)
}

/// Last token of a normalized name.
///
/// `"doe j"` (from `"Doe, J."`) is a comma-inverted name, so its surname is
/// the first token; single-letter trailing tokens are treated as initials.
fn surname(normalized: &str) -> Option<&str> {
    let tokens: Vec<&str> = normalized.split(' ').collect();
    let last = *tokens.last()?;
    if tokens.len() > 1 && last.chars().count() == 1 {
        return tokens.first().copied();
    }
    Some(last)
}
