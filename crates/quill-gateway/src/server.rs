// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use quill_core::QuillError;
use quill_reconcile::Reconciler;
use quill_router::AiRouter;
use quill_search::MultiSourceSearch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub router: Arc<AiRouter>,
    pub reconciler: Arc<Reconciler>,
    pub search: Arc<MultiSourceSearch>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(router: Arc<AiRouter>, reconciler: Reconciler, search: MultiSourceSearch) -> Self {
        Self {
            router,
            reconciler: Arc::new(reconciler),
            search: Arc::new(search),
            start_time: Instant::now(),
        }
    }
}

/// All gateway routes.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/generate", post(handlers::post_generate))
        .route("/v1/structure", post(handlers::post_structure))
        .route("/v1/usage", get(handlers::get_usage))
        .route("/v1/usage/reset", post(handlers::post_usage_reset))
        .route(
            "/v1/providers/{provider}/enabled",
            post(handlers::post_provider_enabled),
        )
        .route("/v1/references/sync", post(handlers::post_sync))
        .route("/v1/references/resolve", post(handlers::post_resolve))
        .route("/v1/research/search", post(handlers::post_search))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), QuillError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuillError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| QuillError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
