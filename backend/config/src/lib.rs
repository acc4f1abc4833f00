//! `texplain-config` — configuration for the texplain pipeline.
//!
//! Provides:
//! - Typed config schema (OCR tool, LLM provider, logging)
//! - YAML loading from `~/.texplain/config.yaml`
//! - `${ENV_VAR}` substitution and `TEXPLAIN_*` overrides
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{
    apply_env_overrides, contains_env_var_reference, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_raw_config};
pub use redact::redact;
pub use schema::{LlmConfig, LoggingConfig, OcrConfig, TexplainConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use texplain_core::TexplainError;

/// Load a config file, substitute env vars, and apply env overrides.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<TexplainConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// [`load_and_prepare`] against an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<TexplainConfig> {
    let raw = load_raw_config(path).await?;

    let plaintext_api_key = raw
        .pointer("/llm/api_key")
        .and_then(Value::as_str)
        .is_some_and(|key| !key.is_empty() && !contains_env_var_reference(key));

    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let mut config: TexplainConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    config.llm.plaintext_api_key = plaintext_api_key;
    config.rejected_overrides = apply_env_overrides(&mut config, env);
    Ok(config)
}

/// Validate a fully-assembled config, logging warnings and failing on errors.
pub fn ensure_valid(config: &TexplainConfig) -> Result<(), TexplainError> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if report.is_valid() {
        return Ok(());
    }
    let message = report
        .errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(TexplainError::ConfigError(message))
}

/// The effective config as a redacted value tree, safe to print.
///
/// `llm.api_key` shows the key the run will use, including one taken from
/// the provider's env var.
pub fn redacted_view(config: &TexplainConfig) -> Result<Value> {
    redacted_view_with(config, |name| std::env::var(name).ok())
}

/// [`redacted_view`] with an explicit env lookup.
pub fn redacted_view_with(
    config: &TexplainConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Value> {
    let mut effective = config.clone();
    effective.llm.api_key = config.llm.resolved_api_key_with(lookup);
    let value = serde_json::to_value(&effective).context("Failed to serialize config")?;
    Ok(redact(&value))
}
