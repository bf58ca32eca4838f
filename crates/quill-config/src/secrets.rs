// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution.
//!
//! A credential comes from the config file when set and non-empty, otherwise
//! from a well-known environment variable. Either way it is wrapped in a
//! [`SecretString`] so it never reaches `Debug` output or logs.

use quill_core::QuillError;
use secrecy::SecretString;

/// Anthropic API key fallback variable.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// OpenAI API key fallback variable.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Zotero API key fallback variable.
pub const ZOTERO_API_KEY_ENV: &str = "ZOTERO_API_KEY";
/// Optional Semantic Scholar API key fallback variable.
pub const SEMANTIC_SCHOLAR_API_KEY_ENV: &str = "SEMANTIC_SCHOLAR_API_KEY";

/// Resolve a credential from config, then from the environment variable `env_var`.
///
/// `setting` names the config key in the error message, e.g. `anthropic.api_key`.
pub fn resolve_secret(
    config_value: Option<&str>,
    env_var: &str,
    setting: &str,
) -> Result<SecretString, QuillError> {
    pick_secret(config_value, std::env::var(env_var).ok(), env_var, setting)
}

/// Like [`resolve_secret`] but a missing credential is not an error.
pub fn optional_secret(config_value: Option<&str>, env_var: &str) -> Option<SecretString> {
    pick_secret(config_value, std::env::var(env_var).ok(), env_var, "").ok()
}

fn pick_secret(
    config_value: Option<&str>,
    env_value: Option<String>,
    env_var: &str,
    setting: &str,
) -> Result<SecretString, QuillError> {
    if let Some(value) = config_value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(value.to_string()));
    }

    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            QuillError::Config(format!(
                "credential not found. Set {setting} in config or the {env_var} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn config_value_wins() {
        let secret = pick_secret(
            Some("sk-config"),
            Some("sk-env".into()),
            ANTHROPIC_API_KEY_ENV,
            "anthropic.api_key",
        )
        .unwrap();
        assert_eq!(secret.expose_secret(), "sk-config");
    }

    #[test]
    fn empty_config_falls_back_to_env() {
        let secret = pick_secret(
            Some("  "),
            Some("sk-env".into()),
            OPENAI_API_KEY_ENV,
            "openai.api_key",
        )
        .unwrap();
        assert_eq!(secret.expose_secret(), "sk-env");
    }

    #[test]
    fn missing_everywhere_names_both_sources() {
        let err = pick_secret(None, None, ZOTERO_API_KEY_ENV, "zotero.api_key").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("zotero.api_key"), "got: {msg}");
        assert!(msg.contains("ZOTERO_API_KEY"), "got: {msg}");
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = pick_secret(Some("sk-secret"), None, "X", "x").unwrap();
        assert!(!format!("{secret:?}").contains("sk-secret"));
    }
}
