// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Academic literature search for Quill's research step.

pub mod arxiv;
pub mod crossref;
mod http;
pub mod multi;
pub mod semantic_scholar;

pub use arxiv::ArxivSource;
pub use crossref::CrossRefSource;
pub use multi::{MultiSourceSearch, SearchOutcome};
pub use semantic_scholar::SemanticScholarSource;
