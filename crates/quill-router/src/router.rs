// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost-ranked provider selection with failover and budget enforcement.
//!
//! Each request walks the pool at most once: pick the cheapest eligible
//! provider for the task, call it, and on a retryable failure put it in a
//! cool-down and pick again from what is left. The state lock is released
//! before every provider call and re-acquired to apply the outcome.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use quill_config::model::{CostConfig, RoutingConfig};
use quill_core::{
    FailedAttempt, ProviderAdapter, ProviderErrorKind, ProviderRequest, ProviderResponse,
    QuillError, TaskType, TokenUsage,
};
use quill_cost::{BudgetSnapshot, BudgetState, CostTable, UsageLedger, UsageRecord};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::availability::Availability;

/// A provider in the pool together with its capability cost table.
pub struct ProviderSlot {
    adapter: Arc<dyn ProviderAdapter>,
    costs: CostTable,
}

impl ProviderSlot {
    pub fn new(adapter: Arc<dyn ProviderAdapter>, costs: CostTable) -> Self {
        Self { adapter, costs }
    }

    /// Provider identifier, taken from the adapter.
    pub fn id(&self) -> &str {
        self.adapter.name()
    }
}

/// A generation request as accepted by [`AiRouter::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub task_type: TaskType,
    pub system_prompt: Option<String>,
    /// Overrides the adapter's default output limit.
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            prompt: prompt.into(),
            task_type,
            system_prompt: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn to_provider_request(&self) -> ProviderRequest {
        ProviderRequest {
            prompt: self.prompt.clone(),
            system_prompt: self.system_prompt.clone(),
            model: None,
            max_tokens: self.max_tokens,
            task_type: self.task_type,
        }
    }
}

/// Token counts of a completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl From<TokenUsage> for GenerationUsage {
    fn from(usage: TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens(),
        }
    }
}

/// Result of a successful generation, annotated with the provider that served it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub content: String,
    pub usage: GenerationUsage,
    /// Provider-reported cost of the successful call only, in USD.
    pub cost: f64,
    pub provider: String,
    pub model: String,
}

/// Usage and availability of one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    #[serde(flatten)]
    pub usage: UsageRecord,
    pub availability: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_remaining_secs: Option<u64>,
}

/// Point-in-time view of the router's accounting.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSnapshot {
    pub providers: Vec<ProviderStatus>,
    pub budget: BudgetSnapshot,
}

struct RouterState {
    availability: Vec<Availability>,
    usage: UsageLedger,
    budget: BudgetState,
}

/// Multi-provider router.
///
/// The pool is fixed at construction; only availability, usage and budget
/// change afterwards.
pub struct AiRouter {
    slots: Vec<ProviderSlot>,
    cooldown: Duration,
    state: Mutex<RouterState>,
}

impl AiRouter {
    /// Create a router over `slots`, in configuration order.
    pub fn new(slots: Vec<ProviderSlot>, cooldown: Duration, budget: BudgetState) -> Self {
        let usage = UsageLedger::new(slots.iter().map(ProviderSlot::id));
        let availability = vec![Availability::Healthy; slots.len()];
        info!(
            providers = ?slots.iter().map(ProviderSlot::id).collect::<Vec<_>>(),
            cooldown_secs = cooldown.as_secs(),
            monthly_limit = ?budget.monthly_limit(),
            "AI router initialized"
        );
        Self {
            slots,
            cooldown,
            state: Mutex::new(RouterState {
                availability,
                usage,
                budget,
            }),
        }
    }

    /// Create a router with cool-down and budget taken from configuration.
    pub fn from_config(slots: Vec<ProviderSlot>, routing: &RoutingConfig, cost: &CostConfig) -> Self {
        Self::new(
            slots,
            Duration::from_secs(routing.cooldown_secs),
            BudgetState::new(cost),
        )
    }

    /// Provider identifiers in configuration order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.id().to_string()).collect()
    }

    /// Generate text for `prompt`, failing over across the pool.
    pub async fn generate_with_failover(
        &self,
        prompt: &str,
        task_type: TaskType,
    ) -> Result<GenerationResult, QuillError> {
        self.generate(GenerationRequest::new(prompt, task_type)).await
    }

    /// Generate text, failing over across the pool.
    ///
    /// Makes at most one call per provider. Returns
    /// [`QuillError::ProviderUnavailable`] or [`QuillError::BudgetExceeded`]
    /// when no provider is eligible, and [`QuillError::ProviderCallFailed`]
    /// when a provider rejects the request itself.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, QuillError> {
        let mut excluded = vec![false; self.slots.len()];
        let mut attempts: Vec<FailedAttempt> = Vec::new();

        loop {
            let index = self.select(&request, &excluded, &attempts).await?;
            let slot = &self.slots[index];
            let provider = slot.id();

            info!(
                provider,
                task_type = %request.task_type,
                attempt = attempts.len() + 1,
                "dispatching generation request"
            );

            match slot.adapter.complete(request.to_provider_request()).await {
                Ok(response) => {
                    self.record_success(index, &response).await;
                    info!(
                        provider,
                        model = %response.model,
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        cost_usd = response.cost_usd,
                        "generation succeeded"
                    );
                    return Ok(GenerationResult {
                        content: response.content,
                        usage: response.usage.into(),
                        cost: response.cost_usd,
                        provider: provider.to_string(),
                        model: response.model,
                    });
                }
                Err(err) if err.is_retryable() => {
                    let retry_after = retry_hint(&err);
                    self.start_cooldown(index, &err, retry_after).await;
                    excluded[index] = true;
                    attempts.push(FailedAttempt {
                        provider: provider.to_string(),
                        message: err.detail(),
                        retry_after,
                    });
                }
                Err(err) => {
                    self.state.lock().await.usage.record_failure(provider);
                    warn!(provider, error = %err, "provider rejected request, not failing over");
                    return Err(QuillError::ProviderCallFailed {
                        provider: provider.to_string(),
                        status: rejection_status(&err),
                        message: err.detail(),
                    });
                }
            }
        }
    }

    /// Per-provider usage, availability and the budget state.
    pub async fn usage_snapshot(&self) -> UsageSnapshot {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        for availability in &mut state.availability {
            availability.refresh(now);
        }

        let providers = state
            .usage
            .records()
            .iter()
            .zip(&state.availability)
            .map(|(usage, availability)| ProviderStatus {
                usage: usage.clone(),
                availability: availability.label(),
                cooldown_remaining_secs: availability.cooldown_remaining_secs(now),
            })
            .collect();

        UsageSnapshot {
            providers,
            budget: state.budget.snapshot(),
        }
    }

    /// Zero every provider's usage record. Budget spend is kept.
    pub async fn reset_usage(&self) {
        self.state.lock().await.usage.reset();
        info!("provider usage reset by operator");
    }

    /// Take a provider out of rotation, or put it back as healthy.
    pub async fn set_enabled(&self, provider: &str, enabled: bool) -> Result<(), QuillError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id() == provider)
            .ok_or_else(|| QuillError::InvalidInput(format!("unknown provider `{provider}`")))?;

        self.state.lock().await.availability[index] = if enabled {
            Availability::Healthy
        } else {
            Availability::Disabled
        };
        info!(provider, enabled, "provider availability changed by operator");
        Ok(())
    }

    /// Pick the cheapest eligible provider, or explain why none is eligible.
    async fn select(
        &self,
        request: &GenerationRequest,
        excluded: &[bool],
        attempts: &[FailedAttempt],
    ) -> Result<usize, QuillError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let task = request.task_type;

        let mut healthy = 0usize;
        let mut best: Option<(usize, f64, u64)> = None;

        for (index, slot) in self.slots.iter().enumerate() {
            if excluded[index] {
                continue;
            }
            state.availability[index].refresh(now);
            if !state.availability[index].is_healthy() {
                continue;
            }
            healthy += 1;

            let projected = slot.costs.projected_cost(&request.prompt, task);
            if state.budget.would_exceed(projected) {
                debug!(provider = slot.id(), projected_usd = projected, "over monthly budget");
                continue;
            }

            let rate = slot.costs.rate(task);
            let calls = state.usage.calls(slot.id());
            // Strictly-better comparison keeps the earliest slot on full ties.
            let better = match best {
                None => true,
                Some((_, best_rate, best_calls)) => {
                    rate.total_cmp(&best_rate).then(calls.cmp(&best_calls)) == Ordering::Less
                }
            };
            if better {
                best = Some((index, rate, calls));
            }
        }

        if let Some((index, _, _)) = best {
            return Ok(index);
        }

        if healthy > 0 && attempts.is_empty() {
            let limit = state.budget.monthly_limit().unwrap_or_default();
            warn!(
                task_type = %task,
                monthly_limit = limit,
                consumed = state.budget.consumed(),
                "request refused, monthly budget exhausted"
            );
            return Err(QuillError::BudgetExceeded {
                message: format!(
                    "monthly budget of ${limit:.2} would be exceeded by this request"
                ),
            });
        }

        let message = if self.slots.is_empty() {
            "no providers configured".to_string()
        } else if attempts.is_empty() {
            "no healthy provider available".to_string()
        } else {
            let tried: Vec<&str> = attempts.iter().map(|a| a.provider.as_str()).collect();
            format!("all eligible providers failed ({})", tried.join(", "))
        };
        warn!(task_type = %task, attempts = attempts.len(), "{message}");
        Err(QuillError::ProviderUnavailable {
            message,
            attempts: attempts.to_vec(),
        })
    }

    async fn record_success(&self, index: usize, response: &ProviderResponse) {
        let mut state = self.state.lock().await;
        if !matches!(state.availability[index], Availability::Disabled) {
            state.availability[index] = Availability::Healthy;
        }
        state
            .usage
            .record_success(self.slots[index].id(), &response.usage, response.cost_usd);
        state.budget.record_cost(response.cost_usd);
    }

    async fn start_cooldown(&self, index: usize, err: &QuillError, retry_after: Option<Duration>) {
        let window = retry_after.map_or(self.cooldown, |hint| hint.max(self.cooldown));
        let provider = self.slots[index].id();

        let mut state = self.state.lock().await;
        state.usage.record_failure(provider);
        state.availability[index] = Availability::CoolingDown {
            until: Instant::now() + window,
            reason: err.detail(),
        };
        warn!(
            provider,
            error = %err,
            cooldown_secs = window.as_secs(),
            "provider failed, cooling down and failing over"
        );
    }
}

fn retry_hint(err: &QuillError) -> Option<Duration> {
    match err {
        QuillError::Provider { kind, .. } => kind.retry_after(),
        _ => None,
    }
}

fn rejection_status(err: &QuillError) -> Option<u16> {
    match err {
        QuillError::Provider {
            kind:
                ProviderErrorKind::Unauthorized { status } | ProviderErrorKind::InvalidRequest { status },
            ..
        } => Some(*status),
        _ => None,
    }
}
