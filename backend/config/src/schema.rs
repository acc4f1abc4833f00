//! Typed config schema for `config.yaml`.
//!
//! Every section and field is optional in the file; missing values fall back
//! to the constants in [`crate::defaults`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use texplain_core::ProviderKind;

use crate::defaults::*;
use crate::validation::ConfigValidationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexplainConfig {
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    /// `TEXPLAIN_*` values that could not be applied; reported by [`crate::validate`].
    #[serde(skip)]
    pub rejected_overrides: Vec<ConfigValidationError>,
}

/// Formula recognition tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub bin: String,
    /// Extra arguments placed before the image path.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            bin: DEFAULT_OCR_BIN.to_string(),
            args: Vec::new(),
            timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Explanation model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub max_tokens: u32,
    /// Falls back to the provider's env var (e.g. `CEREBRAS_API_KEY`) when unset.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub request_timeout_secs: u64,
    /// Set at load time when the file holds a literal key rather than a `${VAR}`.
    #[serde(skip)]
    pub plaintext_api_key: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_key: None,
            base_url: None,
            system_prompt: String::new(),
            temperature: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            plaintext_api_key: false,
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured key, or the provider's env var when the config has none.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolved_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.provider
                    .api_key_env()
                    .and_then(|name| lookup(name))
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling JSON log files; no file output when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}
