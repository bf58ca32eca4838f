// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference reconciliation for Quill.
//!
//! Matches locally held references against a remote library (Zotero) by
//! fuzzy title and author comparison, and sorts them into imports, exports
//! and conflicts. The same matching deduplicates academic search results.

pub mod citation;
pub mod dedupe;
pub mod normalize;
pub mod reconciler;
pub mod similarity;
pub mod validation;

pub use citation::{in_text_citation, with_citation};
pub use dedupe::dedupe_and_rank;
pub use normalize::{normalize_doi, normalize_name, normalize_title};
pub use reconciler::{
    ConflictReason, ConflictRecord, Partition, ReconciliationResult, Reconciler, ResolveStrategy,
    classify, merge,
};
pub use similarity::{authors_match, is_same_work, titles_match};
pub use validation::{Invalid, validate};
