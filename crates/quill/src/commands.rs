// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands: `generate`, `search` and `config`.

use std::io::IsTerminal;

use quill_config::QuillConfig;
use quill_config::secrets::{
    ANTHROPIC_API_KEY_ENV, OPENAI_API_KEY_ENV, SEMANTIC_SCHOLAR_API_KEY_ENV, ZOTERO_API_KEY_ENV,
    optional_secret,
};
use quill_core::{QuillError, Reference, TaskType};
use quill_router::GenerationRequest;
use serde::Serialize;

use crate::wiring;

/// Options for `quill generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub prompt: String,
    pub task: TaskType,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub json: bool,
}

/// Route one prompt through the configured providers.
///
/// Plain mode prints the generated text on stdout and the provider line on
/// stderr so the output can be piped.
pub async fn run_generate(config: &QuillConfig, args: GenerateArgs) -> Result<(), QuillError> {
    if args.prompt.trim().is_empty() {
        return Err(QuillError::InvalidInput("prompt must not be empty".into()));
    }

    let router = wiring::build_router(config)?;
    let mut request = GenerationRequest::new(args.prompt, args.task);
    if let Some(system) = args.system {
        request = request.with_system_prompt(system);
    }
    if let Some(max_tokens) = args.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let result = router.generate(request).await?;
    if args.json {
        println!("{}", to_pretty_json(&result)?);
    } else {
        println!("{}", result.content);
        eprintln!(
            "quill: {} ({}) {} tokens, ${:.6}",
            result.provider, result.model, result.usage.total_tokens, result.cost
        );
    }
    Ok(())
}

/// Search every configured academic source for `query`.
pub async fn run_search(config: &QuillConfig, query: &str, json: bool) -> Result<(), QuillError> {
    let search = wiring::build_search(config)?;
    let outcome = search.search(query).await?;

    if json {
        println!("{}", to_pretty_json(&outcome)?);
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    if outcome.results.is_empty() {
        println!("No results for \"{query}\".");
    }
    for (i, reference) in outcome.results.iter().enumerate() {
        print_reference(i + 1, reference, use_color);
    }
    if !outcome.failed_sources.is_empty() {
        eprintln!(
            "quill: sources unavailable: {}",
            outcome.failed_sources.join(", ")
        );
    }
    Ok(())
}

fn print_reference(index: usize, reference: &Reference, use_color: bool) {
    let year = reference
        .year
        .map_or_else(|| "n.d.".to_string(), |y| y.to_string());
    if use_color {
        use colored::Colorize;
        println!("{:>3}. {} ({})", index, reference.title.bold(), year);
        println!("     {}", reference.citation.dimmed());
    } else {
        println!("{:>3}. {} ({})", index, reference.title, year);
        println!("     {}", reference.citation);
    }
    if !reference.authors.is_empty() {
        println!("     {}", reference.authors.join(", "));
    }
    if let Some(doi) = &reference.doi {
        println!("     doi:{doi}");
    }
}

/// Redacted view of the effective configuration.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub listen: String,
    pub log_level: String,
    pub providers: Vec<ProviderSummary>,
    pub cooldown_secs: u64,
    pub monthly_budget_usd: Option<f64>,
    pub zotero: StoreSummary,
    pub search_sources: Vec<String>,
    pub semantic_scholar_key: bool,
}

#[derive(Debug, Serialize)]
pub struct ProviderSummary {
    pub name: &'static str,
    pub model: String,
    pub api_key: bool,
    pub default_rate_per_mtok: f64,
}

#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub library: Option<String>,
    pub api_key: bool,
}

impl ConfigSummary {
    /// Secrets are reduced to whether they resolve, never their value.
    pub fn from_config(config: &QuillConfig) -> Self {
        let has = |value: Option<&str>, env: &str| optional_secret(value, env).is_some();
        Self {
            listen: format!("{}:{}", config.server.host, config.server.port),
            log_level: config.server.log_level.clone(),
            providers: vec![
                ProviderSummary {
                    name: "anthropic",
                    model: config.anthropic.default_model.clone(),
                    api_key: has(config.anthropic.api_key.as_deref(), ANTHROPIC_API_KEY_ENV),
                    default_rate_per_mtok: config.anthropic.default_rate_per_mtok,
                },
                ProviderSummary {
                    name: "openai",
                    model: config.openai.default_model.clone(),
                    api_key: has(config.openai.api_key.as_deref(), OPENAI_API_KEY_ENV),
                    default_rate_per_mtok: config.openai.default_rate_per_mtok,
                },
            ],
            cooldown_secs: config.routing.cooldown_secs,
            monthly_budget_usd: config.cost.monthly_budget_usd,
            zotero: StoreSummary {
                library: config
                    .zotero
                    .library_id
                    .as_ref()
                    .map(|id| format!("{}/{}", config.zotero.library_type, id)),
                api_key: has(config.zotero.api_key.as_deref(), ZOTERO_API_KEY_ENV),
            },
            search_sources: config.search.sources.clone(),
            semantic_scholar_key: has(
                config.search.semantic_scholar_api_key.as_deref(),
                SEMANTIC_SCHOLAR_API_KEY_ENV,
            ),
        }
    }
}

/// Print the validated configuration. Reaching this point means it loaded.
pub fn run_config(config: &QuillConfig, json: bool) -> Result<(), QuillError> {
    let summary = ConfigSummary::from_config(config);
    if json {
        println!("{}", to_pretty_json(&summary)?);
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    println!();
    println!("  quill config");
    println!("  {}", "-".repeat(35));
    println!("    Listen:   {}", summary.listen);
    println!("    Log:      {}", summary.log_level);
    for provider in &summary.providers {
        println!(
            "    {:<9} {} {} (${}/Mtok)",
            format!("{}:", provider.name),
            key_marker(provider.api_key, use_color),
            provider.model,
            provider.default_rate_per_mtok
        );
    }
    println!("    Cooldown: {}s", summary.cooldown_secs);
    match summary.monthly_budget_usd {
        Some(budget) => println!("    Budget:   ${budget:.2}/month"),
        None => println!("    Budget:   unlimited"),
    }
    println!(
        "    Zotero:   {} {}",
        key_marker(summary.zotero.api_key, use_color),
        summary.zotero.library.as_deref().unwrap_or("offline")
    );
    println!("    Search:   {}", summary.search_sources.join(", "));
    println!();
    Ok(())
}

fn key_marker(present: bool, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        if present {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        }
    } else if present {
        "[OK]".to_string()
    } else {
        "[--]".to_string()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, QuillError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| QuillError::Internal(format!("failed to serialize output: {e}")))
}
