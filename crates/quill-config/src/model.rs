// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Quill.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Quill configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    /// HTTP gateway and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Provider routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Budget settings.
    #[serde(default)]
    pub cost: CostConfig,

    /// Zotero reference store settings.
    #[serde(default)]
    pub zotero: ZoteroConfig,

    /// Academic search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the gateway binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3210
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used when a request does not name one.
    #[serde(default = "default_anthropic_model")]
    pub default_model: String,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Routing rate in USD per million tokens for task types without an entry in `rates`.
    #[serde(default = "default_anthropic_rate")]
    pub default_rate_per_mtok: f64,

    /// Per-task routing rates in USD per million tokens, keyed by task type.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_anthropic_model(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            default_rate_per_mtok: default_anthropic_rate(),
            rates: BTreeMap::new(),
        }
    }
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_anthropic_rate() -> f64 {
    3.0
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub default_model: String,

    /// API root; chat completions are posted to `{base_url}/chat/completions`.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_openai_rate")]
    pub default_rate_per_mtok: f64,

    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_openai_model(),
            base_url: default_openai_base_url(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            default_rate_per_mtok: default_openai_rate(),
            rates: BTreeMap::new(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_rate() -> f64 {
    2.5
}

/// Provider routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Seconds a provider stays out of rotation after a retryable failure.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

fn default_cooldown_secs() -> u64 {
    60
}

/// Budget configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Maximum monthly spending limit in USD. `None` means no limit.
    #[serde(default)]
    pub monthly_budget_usd: Option<f64>,

    /// Fraction of the monthly budget at which a warning is logged.
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            monthly_budget_usd: None,
            warn_threshold: default_warn_threshold(),
        }
    }
}

fn default_warn_threshold() -> f64 {
    0.8
}

/// Zotero Web API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZoteroConfig {
    /// Zotero API key. `None` falls back to `ZOTERO_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Numeric user or group id. Reconciliation runs offline when unset.
    #[serde(default)]
    pub library_id: Option<String>,

    /// `user` or `group`.
    #[serde(default = "default_library_type")]
    pub library_type: String,

    #[serde(default = "default_zotero_base_url")]
    pub base_url: String,
}

impl Default for ZoteroConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            library_id: None,
            library_type: default_library_type(),
            base_url: default_zotero_base_url(),
        }
    }
}

fn default_library_type() -> String {
    "user".to_string()
}

fn default_zotero_base_url() -> String {
    "https://api.zotero.org".to_string()
}

/// Academic search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Optional Semantic Scholar API key for higher rate limits.
    #[serde(default)]
    pub semantic_scholar_api_key: Option<String>,

    /// Contact address sent to CrossRef for its polite pool.
    #[serde(default)]
    pub crossref_mailto: Option<String>,

    /// Results requested from each source.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Enabled sources: `semantic_scholar`, `crossref`, `arxiv`.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic_scholar_api_key: None,
            crossref_mailto: None,
            max_results: default_max_results(),
            request_timeout_secs: default_search_timeout_secs(),
            sources: default_sources(),
        }
    }
}

fn default_max_results() -> usize {
    10
}

fn default_search_timeout_secs() -> u64 {
    30
}

fn default_sources() -> Vec<String> {
    KNOWN_SEARCH_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Search sources the binary knows how to build.
pub const KNOWN_SEARCH_SOURCES: &[&str] = &["semantic_scholar", "crossref", "arxiv"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = QuillConfig::default();
        assert_eq!(config.server.port, 3210);
        assert_eq!(config.routing.cooldown_secs, 60);
        assert_eq!(config.cost.monthly_budget_usd, None);
        assert!((config.cost.warn_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.zotero.library_type, "user");
        assert_eq!(config.search.sources, vec!["semantic_scholar", "crossref", "arxiv"]);
    }

    #[test]
    fn rates_table_deserializes() {
        let toml_str = r#"
[openai]
default_rate_per_mtok = 2.0

[openai.rates]
outline = 0.5
structure-guidance = 1.5
"#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.openai.rates.get("outline"), Some(&0.5));
        assert_eq!(config.openai.rates.get("structure-guidance"), Some(&1.5));
        assert_eq!(config.openai.default_model, "gpt-4o");
    }

    #[test]
    fn zotero_deny_unknown_fields() {
        let toml_str = r#"
[zotero]
library = "123"
"#;
        assert!(toml::from_str::<QuillConfig>(toml_str).is_err());
    }
}
