// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of the router, reconciler and search from configuration.

use std::sync::Arc;

use quill_anthropic::AnthropicProvider;
use quill_config::QuillConfig;
use quill_config::secrets::{
    ANTHROPIC_API_KEY_ENV, OPENAI_API_KEY_ENV, ZOTERO_API_KEY_ENV, optional_secret,
};
use quill_core::QuillError;
use quill_cost::CostTable;
use quill_openai::OpenAiProvider;
use quill_reconcile::Reconciler;
use quill_router::{AiRouter, ProviderSlot};
use quill_search::MultiSourceSearch;
use quill_zotero::ZoteroStore;
use tracing::{info, warn};

/// Providers with a resolvable API key, Anthropic first.
///
/// A provider without a key is skipped; an empty pool is allowed so that
/// reconciliation and search still work.
pub fn build_provider_slots(config: &QuillConfig) -> Result<Vec<ProviderSlot>, QuillError> {
    let mut slots = Vec::new();

    if optional_secret(config.anthropic.api_key.as_deref(), ANTHROPIC_API_KEY_ENV).is_some() {
        let provider = AnthropicProvider::new(&config.anthropic)?;
        slots.push(ProviderSlot::new(
            Arc::new(provider),
            CostTable::from_config(config.anthropic.default_rate_per_mtok, &config.anthropic.rates),
        ));
    } else {
        info!("anthropic provider skipped (no API key)");
    }

    if optional_secret(config.openai.api_key.as_deref(), OPENAI_API_KEY_ENV).is_some() {
        let provider = OpenAiProvider::new(&config.openai)?;
        slots.push(ProviderSlot::new(
            Arc::new(provider),
            CostTable::from_config(config.openai.default_rate_per_mtok, &config.openai.rates),
        ));
    } else {
        info!("openai provider skipped (no API key)");
    }

    if slots.is_empty() {
        warn!("no AI provider configured; generation requests will fail");
    }
    Ok(slots)
}

pub fn build_router(config: &QuillConfig) -> Result<AiRouter, QuillError> {
    let slots = build_provider_slots(config)?;
    Ok(AiRouter::from_config(slots, &config.routing, &config.cost))
}

/// A Zotero-backed reconciler when a library is configured, otherwise offline.
pub fn build_reconciler(config: &QuillConfig) -> Result<Reconciler, QuillError> {
    let has_library = config
        .zotero
        .library_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    let has_key = optional_secret(config.zotero.api_key.as_deref(), ZOTERO_API_KEY_ENV).is_some();

    if has_library && has_key {
        Ok(Reconciler::new(Arc::new(ZoteroStore::new(&config.zotero)?)))
    } else {
        info!(has_library, has_key, "no Zotero library configured, reference sync runs offline");
        Ok(Reconciler::offline())
    }
}

pub fn build_search(config: &QuillConfig) -> Result<MultiSourceSearch, QuillError> {
    MultiSourceSearch::from_config(&config.search)
}
