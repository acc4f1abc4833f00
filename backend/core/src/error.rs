use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the texplain pipeline.
#[derive(Debug, Error)]
pub enum TexplainError {
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("failed to start OCR tool `{bin}`: {source}")]
    OcrSpawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR tool `{bin}` timed out after {secs}s")]
    OcrTimeout { bin: String, secs: u64 },

    #[error("OCR tool exited with {}: {stderr}", exit_code_label(.code))]
    OcrFailed { code: Option<i32>, stderr: String },

    #[error("no API key configured for provider {provider} (set {env_var} or llm.api_key)")]
    MissingApiKey { provider: String, env_var: String },

    #[error("LLM provider {provider} returned no completion choices")]
    EmptyCompletion { provider: String },

    #[error("LLM provider error ({provider}): {message}")]
    LlmError { provider: String, message: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TexplainError {
    /// True for failures of the recognition step, before any model request.
    pub fn is_ocr_failure(&self) -> bool {
        matches!(
            self,
            Self::OcrSpawn { .. } | Self::OcrTimeout { .. } | Self::OcrFailed { .. }
        )
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
