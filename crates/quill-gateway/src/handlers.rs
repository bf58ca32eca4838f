// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::Json;
use axum::extract::{Path, State};
use quill_core::{GenerationContent, QuillError, Reference, TaskType};
use quill_reconcile::{ConflictRecord, ReconciliationResult, ResolveStrategy};
use quill_router::{GenerationRequest, GenerationResult, UsageSnapshot};
use quill_search::SearchOutcome;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::server::GatewayState;

/// System prompt used when a caller asks for structured output.
const STRUCTURE_SYSTEM_PROMPT: &str = "Respond with a single JSON object or array and nothing else.";

/// Request body for POST /v1/generate.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl GenerateBody {
    fn into_request(self) -> Result<GenerationRequest, QuillError> {
        if self.prompt.trim().is_empty() {
            return Err(QuillError::InvalidInput("prompt is empty".to_string()));
        }
        let mut request = GenerationRequest::new(self.prompt, self.task_type);
        request.system_prompt = self.system_prompt;
        request.max_tokens = self.max_tokens;
        Ok(request)
    }
}

/// Caller-facing usage: total tokens and the cost of the serving call.
#[derive(Debug, Serialize)]
pub struct UsageBody {
    pub tokens: u32,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost: f64,
}

/// Response body for POST /v1/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
    pub usage: UsageBody,
    pub provider: String,
    pub model: String,
}

/// Response body for POST /v1/structure.
#[derive(Debug, Serialize)]
pub struct StructureResponse {
    pub content: GenerationContent,
    pub usage: UsageBody,
    pub provider: String,
    pub model: String,
}

fn usage_body(result: &GenerationResult) -> UsageBody {
    UsageBody {
        tokens: result.usage.total_tokens,
        input_tokens: result.usage.input_tokens,
        output_tokens: result.usage.output_tokens,
        cost: result.cost,
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub providers: Vec<String>,
    pub remote_store: bool,
}

/// Request body for POST /v1/references/sync.
///
/// With `remote` present the store is not listed and `local` is reconciled
/// against the supplied records.
#[derive(Debug, Deserialize)]
pub struct SyncBody {
    #[serde(default)]
    pub local: Vec<Reference>,
    #[serde(default)]
    pub remote: Option<Vec<Reference>>,
}

/// Request body for POST /v1/references/resolve.
#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub conflict: ConflictRecord,
    pub strategy: ResolveStrategy,
}

/// Request body for POST /v1/research/search.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        providers: state.router.provider_ids(),
        remote_store: state.reconciler.has_store(),
    })
}

/// POST /v1/generate
pub async fn post_generate(
    State(state): State<GatewayState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let result = state.router.generate(body.into_request()?).await?;
    Ok(Json(GenerateResponse {
        usage: usage_body(&result),
        content: result.content,
        provider: result.provider,
        model: result.model,
    }))
}

/// POST /v1/structure
///
/// Generates with a JSON-only system prompt unless the caller supplies one,
/// and returns the parsed content. Unparseable output comes back as
/// `unstructured` for the caller to format.
pub async fn post_structure(
    State(state): State<GatewayState>,
    Json(mut body): Json<GenerateBody>,
) -> Result<Json<StructureResponse>, ApiError> {
    if body.system_prompt.is_none() {
        body.system_prompt = Some(STRUCTURE_SYSTEM_PROMPT.to_string());
    }
    let result = state.router.generate(body.into_request()?).await?;
    let content = GenerationContent::parse(&result.content);
    info!(provider = %result.provider, structured = content.is_structured(), "structure generated");
    Ok(Json(StructureResponse {
        usage: usage_body(&result),
        content,
        provider: result.provider,
        model: result.model,
    }))
}

/// GET /v1/usage
pub async fn get_usage(State(state): State<GatewayState>) -> Json<UsageSnapshot> {
    Json(state.router.usage_snapshot().await)
}

/// POST /v1/usage/reset
pub async fn post_usage_reset(State(state): State<GatewayState>) -> Json<UsageSnapshot> {
    state.router.reset_usage().await;
    Json(state.router.usage_snapshot().await)
}

/// Request body for POST /v1/providers/{provider}/enabled.
#[derive(Debug, Deserialize)]
pub struct EnabledBody {
    pub enabled: bool,
}

/// POST /v1/providers/{provider}/enabled
///
/// Takes a provider out of rotation or restores it as healthy.
pub async fn post_provider_enabled(
    State(state): State<GatewayState>,
    Path(provider): Path<String>,
    Json(body): Json<EnabledBody>,
) -> Result<Json<UsageSnapshot>, ApiError> {
    state.router.set_enabled(&provider, body.enabled).await?;
    Ok(Json(state.router.usage_snapshot().await))
}

/// POST /v1/references/sync
pub async fn post_sync(
    State(state): State<GatewayState>,
    Json(body): Json<SyncBody>,
) -> Json<ReconciliationResult> {
    let result = match &body.remote {
        Some(remote) => state.reconciler.reconcile(&body.local, remote).await,
        None => state.reconciler.sync(&body.local).await,
    };
    Json(result)
}

/// POST /v1/references/resolve
pub async fn post_resolve(
    State(state): State<GatewayState>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<Reference>, ApiError> {
    let resolved = state
        .reconciler
        .resolve_conflict(&body.conflict, body.strategy)
        .await?;
    Ok(Json(resolved))
}

/// POST /v1/research/search
pub async fn post_search(
    State(state): State<GatewayState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchOutcome>, ApiError> {
    Ok(Json(state.search.search(&body.query).await?))
}
