// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration errors.
//!
//! Figment reports unknown keys with the list of fields the target struct
//! accepts, so suggestions always come from `QuillConfig` itself. Keys are
//! reported as dotted paths (`routing.cooldown_secs`); keys that came from
//! the environment are reported as the `QUILL_*` variable that set them.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score above which a key is offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "QUILL_";

/// Source name used for configuration parsed from a string.
pub const INLINE_SOURCE: &str = "<inline>";

/// A configuration error with enough context for miette to point at it.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(quill::config::unknown_key),
        help("{}", key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted path of the unrecognized key.
        key: String,
        suggestion: Option<String>,
        /// Keys accepted at that level, comma separated.
        valid_keys: String,
        #[label("not a quill setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A `QUILL_*` variable that maps to no setting.
    #[error("environment variable `{var}` does not match any setting")]
    #[diagnostic(
        code(quill::config::unknown_env),
        help("{}", env_help(suggestion.as_deref()))
    )]
    UnknownEnvVar {
        var: String,
        /// Closest valid variable name.
        suggestion: Option<String>,
    },

    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(code(quill::config::invalid_type))]
    InvalidType {
        key: String,
        detail: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but breaks a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(quill::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(quill::config::other))]
    Other(String),
}

fn key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys here: {valid_keys}"),
        None => format!("valid keys here: {valid_keys}"),
    }
}

fn env_help(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`?"),
        None => format!("variables take the form {ENV_PREFIX}<SECTION>_<KEY>, e.g. {ENV_PREFIX}SERVER_PORT"),
    }
}

/// Convert every error in a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs a file path (or [`INLINE_SOURCE`]) with its content
/// so spans can be attached.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    let section: Vec<String> = error.path.clone();

    match &error.kind {
        Kind::UnknownField(field, expected) if from_env(error) => {
            let var = env_var_name(&section, field);
            let suggestion = suggest_key(field, expected).map(|s| env_var_name(&section, &s));
            ConfigError::UnknownEnvVar { var, suggestion }
        }
        Kind::UnknownField(field, expected) => {
            let suggestion = suggest_key(field, expected).map(|s| dotted(&section, &s));
            let (span, src) = locate(error, toml_sources, &section, field);
            ConfigError::UnknownKey {
                key: dotted(&section, field),
                suggestion,
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => {
            let key = section.join(".");
            let (span, src) = match section.split_last() {
                Some((field, parent)) => locate(error, toml_sources, parent, field),
                None => (None, None),
            };
            ConfigError::InvalidType {
                key,
                detail: format!("found {actual}, expected {expected}"),
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn from_env(error: &FigmentError) -> bool {
    error
        .metadata
        .as_ref()
        .is_some_and(|m| m.source.is_none() && m.name.contains("environment"))
}

fn dotted(section: &[String], field: &str) -> String {
    if section.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", section.join("."))
    }
}

/// `["cost"]` + `monthly_budget_usd` -> `QUILL_COST_MONTHLY_BUDGET_USD`.
pub fn env_var_name(section: &[String], field: &str) -> String {
    let mut name = ENV_PREFIX.to_string();
    for part in section {
        name.push_str(&part.to_ascii_uppercase());
        name.push('_');
    }
    name.push_str(&field.to_ascii_uppercase());
    name
}

fn locate(
    error: &FigmentError,
    toml_sources: &[(String, String)],
    section: &[String],
    field: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let wanted = file.as_deref().unwrap_or(INLINE_SOURCE);

    let Some((name, content)) = toml_sources.iter().find(|(name, _)| name == wanted) else {
        return (None, None);
    };
    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` inside the table `section` of a TOML document.
///
/// Tracks table headers line by line, so a key is only found under its own
/// header (`[openai.rates]` is `["openai", "rates"]`).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let mut current: Vec<String> = Vec::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = table_header(trimmed) {
            current = header.split('.').map(|p| p.trim().to_string()).collect();
        } else if current == section && line_key(trimmed) == Some(field) {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

fn table_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    if inner.starts_with('[') {
        return None;
    }
    inner.split_once(']').map(|(name, _)| name.trim())
}

fn line_key(line: &str) -> Option<&str> {
    let (key, _) = line.split_once('=')?;
    Some(key.trim().trim_matches('"'))
}

/// Closest accepted key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
