//! Config redaction: produce safe-to-share config snapshots by masking secrets.

use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "secret",
    "password",
];

/// Redact a config JSON value, masking all sensitive fields.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if is_sensitive_key(key) && !s.is_empty() {
        // Preserve length hint: show first 4 chars + ***
        let hint = if s.chars().count() > 8 {
            format!("{}***", s.chars().take(4).collect::<String>())
        } else {
            "***".to_string()
        };
        return Value::String(hint);
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
