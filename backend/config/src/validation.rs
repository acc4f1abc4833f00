//! Config validation with user-friendly error messages.

use crate::schema::TexplainConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl ConfigValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError::new(path, message));
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError::new(path, message));
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TexplainConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.warnings.extend(config.rejected_overrides.iter().cloned());
    validate_ocr(config, &mut report);
    validate_llm(config, &mut report);
    report
}

fn validate_ocr(config: &TexplainConfig, report: &mut ValidationReport) {
    if config.ocr.bin.trim().is_empty() {
        report.error("ocr.bin", "OCR binary must not be empty");
    }
    if config.ocr.timeout_secs == 0 {
        report.error("ocr.timeout_secs", "timeout must be at least 1 second");
    }
}

fn validate_llm(config: &TexplainConfig, report: &mut ValidationReport) {
    let llm = &config.llm;
    if llm.model.trim().is_empty() {
        report.error("llm.model", "model identifier must not be empty");
    }
    if llm.max_tokens == 0 {
        report.error("llm.max_tokens", "max_tokens must be greater than 0");
    }
    if llm.request_timeout_secs == 0 {
        report.error("llm.request_timeout_secs", "timeout must be at least 1 second");
    }
    if let Some(t) = llm.temperature {
        if !(0.0..=2.0).contains(&t) {
            report.warn("llm.temperature", format!("{t} is outside the usual 0.0..=2.0 range"));
        }
    }
    if llm.plaintext_api_key {
        report.warn(
            "llm.api_key",
            "API key is stored in plain text; prefer ${CEREBRAS_API_KEY} or the env var alone",
        );
    }
    if let Some(url) = &llm.base_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            report.error("llm.base_url", format!("'{url}' is not an http(s) URL"));
        }
    }
}
