//! Environment variable substitution and overrides for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` variable names are matched.
//! `$${VAR}` escapes to a literal `${VAR}`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::schema::TexplainConfig;
use crate::validation::ConfigValidationError;

/// Matches `${VAR}` with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$)?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. Returns an error if any referenced env
/// var is not set or is empty.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Check whether a string contains any unescaped env var references.
pub fn contains_env_var_reference(s: &str) -> bool {
    ENV_VAR_PATTERN
        .captures_iter(s)
        .any(|caps| caps.get(1).is_none())
}

/// Apply `TEXPLAIN_*` environment overrides on top of the file config.
///
/// Values that cannot be parsed leave the config untouched and are returned,
/// keyed by variable name, so they can be reported once logging is up.
pub fn apply_env_overrides(
    config: &mut TexplainConfig,
    env: &HashMap<String, String>,
) -> Vec<ConfigValidationError> {
    let mut rejected = Vec::new();
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(provider) = get("TEXPLAIN_PROVIDER") {
        match provider.parse() {
            Ok(kind) => config.llm.provider = kind,
            Err(e) => rejected.push(ConfigValidationError::new(
                "TEXPLAIN_PROVIDER",
                format!("ignoring TEXPLAIN_PROVIDER: {e}"),
            )),
        }
    }
    if let Some(model) = get("TEXPLAIN_MODEL") {
        config.llm.model = model.to_string();
    }
    if let Some(max_tokens) = get("TEXPLAIN_MAX_TOKENS") {
        match max_tokens.parse() {
            Ok(n) => config.llm.max_tokens = n,
            Err(_) => rejected.push(ConfigValidationError::new(
                "TEXPLAIN_MAX_TOKENS",
                format!("ignoring TEXPLAIN_MAX_TOKENS: '{max_tokens}' is not a positive integer"),
            )),
        }
    }
    if let Some(base_url) = get("TEXPLAIN_BASE_URL") {
        config.llm.base_url = Some(base_url.to_string());
    }
    if let Some(bin) = get("TEXPLAIN_OCR_BIN") {
        config.ocr.bin = bin.to_string();
    }
    if let Some(level) = get("TEXPLAIN_LOG") {
        config.logging.level = level.to_string();
    }
    debug!(rejected = rejected.len(), "Applied environment overrides");
    rejected
}
