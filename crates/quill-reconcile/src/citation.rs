// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Author-year in-text citations.

use quill_core::Reference;

/// Format `(Surname, Year)`, `(A & B, Year)` or `(A et al., Year)`.
///
/// Unknown years render as `n.d.`; records without authors cite a
/// shortened title instead.
pub fn in_text_citation(reference: &Reference) -> String {
    let year = reference
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());

    let surnames: Vec<&str> = reference
        .authors
        .iter()
        .filter_map(|a| display_surname(a))
        .collect();

    let who = match surnames.as_slice() {
        [] => short_title(&reference.title),
        [one] => (*one).to_string(),
        [first, second] => format!("{first} & {second}"),
        [first, ..] => format!("{first} et al."),
    };
    format!("({who}, {year})")
}

/// Return the reference with a generated citation if it has none.
pub fn with_citation(mut reference: Reference) -> Reference {
    if reference.citation.trim().is_empty() {
        reference.citation = in_text_citation(&reference);
    }
    reference
}

/// Surname as written: the part before a comma, else the last word.
///
/// A name with nothing before its comma (`", J."`) has no usable surname.
fn display_surname(name: &str) -> Option<&str> {
    let name = name.trim();
    let family = match name.split_once(',') {
        Some((family, _)) => family.trim(),
        None => name.split_whitespace().last()?,
    };
    (!family.is_empty()).then_some(family)
}

fn short_title(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().take(3).collect();
    if words.is_empty() {
        "Anon.".to_string()
    } else {
        format!("\"{}\"", words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(authors: &[&str], year: Option<i32>) -> String {
        in_text_citation(&Reference::new(
            "Some Title Here Again",
            authors.iter().map(|a| a.to_string()).collect(),
            year,
        ))
    }

    #[test]
    fn author_count_forms() {
        assert_eq!(cite(&["John Doe"], Some(2023)), "(Doe, 2023)");
        assert_eq!(cite(&["Doe, John", "Roe, Jane"], Some(2020)), "(Doe & Roe, 2020)");
        assert_eq!(cite(&["A. One", "B. Two", "C. Three"], Some(2019)), "(One et al., 2019)");
    }

    #[test]
    fn empty_family_name_is_skipped() {
        assert_eq!(cite(&[", J.", "Roe, Jane"], Some(2020)), "(Roe, 2020)");
        assert_eq!(cite(&[", J."], Some(2020)), "(\"Some Title Here\", 2020)");
    }

    #[test]
    fn missing_year_and_authors() {
        assert_eq!(cite(&["Ada Lovelace"], None), "(Lovelace, n.d.)");
        assert_eq!(cite(&[], Some(2001)), "(\"Some Title Here\", 2001)");
    }

    #[test]
    fn existing_citation_is_kept() {
        let mut reference = Reference::new("T", vec!["X Y".into()], Some(2000));
        reference.citation = "[1]".into();
        assert_eq!(with_citation(reference).citation, "[1]");
    }
}
