// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization used before any comparison.

/// Lowercase, replace punctuation with spaces, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    collapse(title)
}

/// Same folding as titles; `"Doe, J."` becomes `"doe j"`.
pub fn normalize_name(name: &str) -> String {
    collapse(name)
}

/// Lowercase a DOI and strip any resolver prefix.
///
/// `https://doi.org/10.1000/XYZ`, `doi:10.1000/xyz` and `10.1000/xyz` all
/// normalize to `10.1000/xyz`.
pub fn normalize_doi(doi: &str) -> String {
    let lower = doi.trim().to_lowercase();
    let stripped = [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi.org/",
        "doi:",
    ]
    .iter()
    .find_map(|prefix| lower.strip_prefix(prefix))
    .unwrap_or(&lower);
    stripped.trim().to_string()
}

fn collapse(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn title_folds_case_and_punctuation() {
        assert_eq!(
            normalize_title("  Attention Is All You Need!  "),
            "attention is all you need"
        );
        assert_eq!(
            normalize_title("Deep-Learning:\ta Survey"),
            "deep learning a survey"
        );
    }

    #[test]
    fn name_drops_initial_dots() {
        assert_eq!(normalize_name("Doe, J."), "doe j");
        assert_eq!(normalize_name("María  García"), "maría garcía");
    }

    #[test]
    fn doi_prefixes_are_stripped() {
        assert_eq!(normalize_doi("https://doi.org/10.1000/ABC"), "10.1000/abc");
        assert_eq!(normalize_doi("doi:10.1000/abc"), "10.1000/abc");
        assert_eq!(normalize_doi(" 10.1000/Abc "), "10.1000/abc");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "[A-Za-z0-9 ,.:;!?'()-]{0,60}") {
            let once = normalize_title(&s);
            prop_assert_eq!(normalize_title(&once), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
            prop_assert!(!once.contains("  "));
        }

        #[test]
        fn doi_normalization_is_idempotent(s in "(https://doi.org/)?10\\.[0-9]{4}/[A-Za-z0-9.]{1,12}") {
            let once = normalize_doi(&s);
            prop_assert_eq!(normalize_doi(&once), once);
        }
    }
}
