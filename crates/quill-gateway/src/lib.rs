// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Quill.
//!
//! Exposes generation through the [`quill_router::AiRouter`], reference
//! reconciliation and literature search as a small JSON API. Routing and
//! reconciliation state lives in the components themselves; handlers only
//! translate between HTTP and their result types.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, AttemptBody, ErrorResponse};
pub use server::{GatewayState, build_router, start_server};
