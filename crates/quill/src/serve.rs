// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill serve` command implementation.

use std::sync::Arc;

use quill_config::QuillConfig;
use quill_core::QuillError;
use quill_gateway::{GatewayState, start_server};
use tracing::info;

use crate::shutdown;
use crate::wiring;

/// Build every component from `config` and serve the gateway until a
/// shutdown signal arrives.
pub async fn run_serve(config: QuillConfig) -> Result<(), QuillError> {
    info!("starting quill serve");

    let router = Arc::new(wiring::build_router(&config)?);
    let reconciler = wiring::build_reconciler(&config)?;
    let search = wiring::build_search(&config)?;
    info!(
        providers = ?router.provider_ids(),
        remote_store = reconciler.has_store(),
        search_sources = ?search.source_names(),
        "components initialized"
    );

    let state = GatewayState::new(router, reconciler, search);
    let cancel = shutdown::install_signal_handler();
    start_server(&config.server.host, config.server.port, state, async move {
        cancel.cancelled().await;
    })
    .await?;

    info!("quill serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quill={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_thread_names(false)
        .init();
}
