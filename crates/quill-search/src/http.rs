// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use quill_core::QuillError;

pub(crate) fn search_error(source: &str, message: impl Into<String>) -> QuillError {
    QuillError::Search {
        source_name: source.to_string(),
        message: message.into(),
    }
}

/// Pass through a success response, otherwise turn it into a search error.
pub(crate) async fn check_status(
    source: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, QuillError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(search_error(
        source,
        format!("API returned {status}: {}", body.trim()),
    ))
}
