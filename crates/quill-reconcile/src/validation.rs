// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local reference validation.

use chrono::{Datelike, Utc};
use quill_core::Reference;

use crate::normalize::{normalize_name, normalize_title};

/// Earliest accepted year is `EARLIEST_YEAR + 1`.
const EARLIEST_YEAR: i32 = 1800;

/// How far past the current year a forthcoming work may be dated.
const FUTURE_YEARS: i32 = 5;

/// Why a local reference is left out of reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    EmptyTitle,
    NoAuthors,
    MissingYear,
    YearOutOfRange(i32),
}

/// Check a reference against the current UTC year.
pub fn validate(reference: &Reference) -> Result<(), Invalid> {
    validate_at(reference, Utc::now().year())
}

/// Check a reference as of `current_year`.
pub fn validate_at(reference: &Reference, current_year: i32) -> Result<(), Invalid> {
    if normalize_title(&reference.title).is_empty() {
        return Err(Invalid::EmptyTitle);
    }
    if !reference
        .authors
        .iter()
        .any(|a| !normalize_name(a).is_empty())
    {
        return Err(Invalid::NoAuthors);
    }
    let year = reference.year.ok_or(Invalid::MissingYear)?;
    if year <= EARLIEST_YEAR || year > current_year + FUTURE_YEARS {
        return Err(Invalid::YearOutOfRange(year));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, authors: &[&str], year: Option<i32>) -> Reference {
        Reference::new(title, authors.iter().map(|a| a.to_string()).collect(), year)
    }

    #[test]
    fn accepts_ordinary_record() {
        assert_eq!(validate_at(&paper("Valid Paper", &["A. Author"], Some(2023)), 2026), Ok(()));
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            validate_at(&paper("", &["A"], Some(2023)), 2026),
            Err(Invalid::EmptyTitle)
        );
        assert_eq!(
            validate_at(&paper("  ...  ", &["A"], Some(2023)), 2026),
            Err(Invalid::EmptyTitle)
        );
        assert_eq!(
            validate_at(&paper("Title", &[], Some(2023)), 2026),
            Err(Invalid::NoAuthors)
        );
        assert_eq!(
            validate_at(&paper("Title", &[" "], Some(2023)), 2026),
            Err(Invalid::NoAuthors)
        );
        assert_eq!(
            validate_at(&paper("Title", &["A"], None), 2026),
            Err(Invalid::MissingYear)
        );
    }

    #[test]
    fn year_bounds() {
        let at = |y| validate_at(&paper("T", &["A"], Some(y)), 2026);
        assert_eq!(at(1800), Err(Invalid::YearOutOfRange(1800)));
        assert_eq!(at(1801), Ok(()));
        assert_eq!(at(2031), Ok(()));
        assert_eq!(at(2032), Err(Invalid::YearOutOfRange(2032)));
        assert_eq!(at(3000), Err(Invalid::YearOutOfRange(3000)));
    }
}
