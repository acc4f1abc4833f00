//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging or display.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(c?sk-[a-zA-Z0-9\-_]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}

/// Redacts a known secret value as well as the generic patterns.
pub fn redact_secret(input: &str, secret: Option<&str>) -> String {
    let scrubbed = match secret {
        Some(secret) if !secret.is_empty() => input.replace(secret, "[REDACTED_TOKEN]"),
        _ => input.to_string(),
    };
    redact_sensitive_data(&scrubbed)
}
