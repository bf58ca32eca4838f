// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Quill configuration system.

use std::io::Write;

use quill_config::diagnostic::ConfigError;
use quill_config::model::QuillConfig;
use quill_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with every section deserializes successfully.
#[test]
fn full_toml_deserializes_into_quill_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[anthropic]
api_key = "sk-ant-123"
default_model = "claude-haiku-4-5-20250901"
default_rate_per_mtok = 1.0

[anthropic.rates]
outline = 0.8

[openai]
api_key = "sk-openai"
base_url = "http://localhost:9000/v1"

[routing]
cooldown_secs = 30

[cost]
monthly_budget_usd = 50.0
warn_threshold = 0.9

[zotero]
library_id = "12345"
library_type = "group"

[search]
crossref_mailto = "writer@example.edu"
max_results = 25
sources = ["crossref"]
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-123"));
    assert_eq!(config.anthropic.rates.get("outline"), Some(&0.8));
    assert_eq!(config.openai.base_url, "http://localhost:9000/v1");
    assert_eq!(config.routing.cooldown_secs, 30);
    assert_eq!(config.cost.monthly_budget_usd, Some(50.0));
    assert_eq!(config.zotero.library_id.as_deref(), Some("12345"));
    assert_eq!(config.zotero.library_type, "group");
    assert_eq!(config.search.max_results, 25);
    assert_eq!(config.search.sources, vec!["crossref"]);
}

/// Missing optional sections use defaults without error.
#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("empty config should validate");
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.anthropic.api_version, "2023-06-01");
    assert_eq!(config.openai.default_model, "gpt-4o");
    assert!(config.zotero.library_id.is_none());
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Unknown key in [routing] is reported by dotted path with a suggestion.
#[test]
fn diagnostic_suggests_close_key() {
    let toml = r#"
[routing]
cooldwn_secs = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "routing.cooldwn_secs"
                && suggestion.as_deref() == Some("routing.cooldown_secs")
                && valid_keys.contains("cooldown_secs")
        })
    });
    assert!(has_unknown_key, "got: {errors:?}");
}

/// Unknown key error lists the section's valid keys.
#[test]
fn diagnostic_lists_valid_keys() {
    let toml = r#"
[zotero]
libary = "123"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let lists_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. } if {
            valid_keys.contains("library_id") && valid_keys.contains("library_type")
        })
    });
    assert!(lists_keys, "got: {errors:?}");
}

/// A string where a number is expected is reported as a type error.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "cooldwn_secs".to_string(),
        suggestion: Some("cooldown_secs".to_string()),
        valid_keys: "cooldown_secs".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `cooldown_secs`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("cooldwn_secs"));
}

/// Semantic validation errors surface from load_and_validate_str.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[cost]
monthly_budget_usd = -1.0
warn_threshold = 2.0

[openai.rates]
drafting = 1.0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 3, "got: {errors:?}");
}

/// A config file on disk is loaded by path.
#[test]
fn load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[server]\nport = 9999\n\n[cost]\nmonthly_budget_usd = 5.0").unwrap();

    let config: QuillConfig = load_and_validate_path(file.path()).expect("should load");
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.cost.monthly_budget_usd, Some(5.0));
}

/// `QUILL_*` variables override the file, including keys with underscores.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("quill.toml", "[server]\nport = 4000\n\n[zotero]\nlibrary_type = \"user\"\n")?;
        jail.set_env("QUILL_SERVER_PORT", "5000");
        jail.set_env("QUILL_COST_MONTHLY_BUDGET_USD", "25.5");
        jail.set_env("QUILL_ZOTERO_LIBRARY_ID", "777");
        jail.set_env("QUILL_SEARCH_CROSSREF_MAILTO", "lab@example.edu");

        let config = load_and_validate_path(std::path::Path::new("quill.toml"))
            .expect("env overrides should validate");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.cost.monthly_budget_usd, Some(25.5));
        assert_eq!(config.zotero.library_id.as_deref(), Some("777"));
        assert_eq!(config.search.crossref_mailto.as_deref(), Some("lab@example.edu"));
        Ok(())
    });
}

/// A mistyped `QUILL_*` variable names the variable and the one it probably meant.
#[test]
fn unknown_env_var_is_reported_by_name() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("quill.toml", "[server]\nport = 4000\n")?;
        jail.set_env("QUILL_ROUTING_COOLDOWN_SECZ", "5");

        let errors = load_and_validate_path(std::path::Path::new("quill.toml"))
            .expect_err("unknown variable should be rejected");
        let named = errors.iter().any(|e| {
            matches!(e, ConfigError::UnknownEnvVar { var, suggestion } if {
                var == "QUILL_ROUTING_COOLDOWN_SECZ"
                    && suggestion.as_deref() == Some("QUILL_ROUTING_COOLDOWN_SECS")
            })
        });
        assert!(named, "got: {errors:?}");
        Ok(())
    });
}
