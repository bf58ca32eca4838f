// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Quill.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the provider router, the reference reconciler, and the adapters
//! that talk to LLM providers, Zotero and academic search APIs.

pub mod error;
pub mod reference;
pub mod traits;
pub mod types;

pub use error::{FailedAttempt, ProviderErrorKind, QuillError, parse_retry_after};
pub use reference::Reference;
pub use types::{GenerationContent, ProviderRequest, ProviderResponse, TaskType, TokenUsage};

pub use traits::{ProviderAdapter, ReferenceStore, SearchSource};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            ProviderErrorKind::from_status(429, Some(Duration::from_secs(5))),
            ProviderErrorKind::RateLimited {
                retry_after: Some(Duration::from_secs(5))
            }
        );
        assert_eq!(
            ProviderErrorKind::from_status(529, None),
            ProviderErrorKind::ServerError { status: 529 }
        );
        assert_eq!(
            ProviderErrorKind::from_status(403, None),
            ProviderErrorKind::Unauthorized { status: 403 }
        );
        assert_eq!(
            ProviderErrorKind::from_status(400, None),
            ProviderErrorKind::InvalidRequest { status: 400 }
        );
    }

    #[test]
    fn retry_after_header_values() {
        assert_eq!(parse_retry_after("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after(" 1.5 "), Some(Duration::from_millis(1500)));
        assert_eq!(parse_retry_after("-1"), None);
        assert_eq!(parse_retry_after("Wed, 21 Oct 2026 07:28:00 GMT"), None);
    }

    #[test]
    fn retryable_kinds() {
        assert!(ProviderErrorKind::Network.is_retryable());
        assert!(ProviderErrorKind::Timeout.is_retryable());
        assert!(ProviderErrorKind::MalformedResponse.is_retryable());
        assert!(!ProviderErrorKind::Unauthorized { status: 401 }.is_retryable());
        assert!(!ProviderErrorKind::InvalidRequest { status: 422 }.is_retryable());
    }

    #[test]
    fn provider_error_retryability_follows_kind() {
        let err = QuillError::provider("openai", ProviderErrorKind::Timeout, "timed out");
        assert!(err.is_retryable());
        let err = QuillError::provider(
            "openai",
            ProviderErrorKind::InvalidRequest { status: 400 },
            "bad prompt",
        );
        assert!(!err.is_retryable());
        assert!(!QuillError::InvalidInput("x".into()).is_retryable());
    }

    #[test]
    fn budget_exceeded_counts_as_unavailable() {
        let budget = QuillError::BudgetExceeded {
            message: "monthly budget reached".into(),
        };
        assert!(budget.is_provider_unavailable());
        let unavailable = QuillError::ProviderUnavailable {
            message: "all providers cooling down".into(),
            attempts: vec![],
        };
        assert!(unavailable.is_provider_unavailable());
        assert!(!QuillError::Internal("x".into()).is_provider_unavailable());
    }

    #[test]
    fn unreachable_store_message_mentions_offline_mode() {
        let err = QuillError::RemoteStoreUnreachable {
            message: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "connection refused - operating in offline mode"
        );
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn adapter_traits_are_object_safe() {
        fn _provider(_: &dyn ProviderAdapter) {}
        fn _store(_: &dyn ReferenceStore) {}
        fn _search(_: &dyn SearchSource) {}
    }

    proptest! {
        #[test]
        fn server_statuses_are_retryable(status in 500u16..600) {
            prop_assert!(ProviderErrorKind::from_status(status, None).is_retryable());
        }

        #[test]
        fn client_statuses_other_than_429_are_not(status in 400u16..500) {
            prop_assume!(status != 429);
            prop_assert!(!ProviderErrorKind::from_status(status, None).is_retryable());
        }
    }
}
