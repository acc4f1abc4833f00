use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// OCR binary looked up on `PATH` when none is configured.
pub const DEFAULT_OCR_BIN: &str = "pix2tex";

/// Seconds allowed for one OCR run. Model loading dominates pix2tex start-up.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 120;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Cerebras,
    OpenRouter,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::Cerebras, Self::OpenRouter, Self::Ollama];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cerebras => "cerebras",
            Self::OpenRouter => "openrouter",
            Self::Ollama => "ollama",
        }
    }

    /// Name shown in progress output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cerebras => "Cerebras",
            Self::OpenRouter => "OpenRouter",
            Self::Ollama => "Ollama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Cerebras => "https://api.cerebras.ai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Environment variable holding the API key, if the backend needs one.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Cerebras => Some("CEREBRAS_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::Ollama => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key_env().is_some()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown provider '{s}' (expected cerebras, openrouter, or ollama)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("Cerebras".parse::<ProviderKind>().unwrap(), ProviderKind::Cerebras);
        assert_eq!("ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert!("gpt".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_only_hosted_providers_need_keys() {
        assert!(ProviderKind::Cerebras.requires_api_key());
        assert!(ProviderKind::OpenRouter.requires_api_key());
        assert!(!ProviderKind::Ollama.requires_api_key());
    }
}
