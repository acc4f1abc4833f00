pub mod mock;
pub mod ollama;
pub mod openai_compat;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use texplain_core::{LlmProvider, ProviderKind, TexplainError};

use ollama::OllamaProvider;
use openai_compat::OpenAiCompatProvider;

/// Connection settings for a provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint.
    pub base_url: Option<String>,
    pub request_timeout: Duration,
}

/// Construct the configured provider.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>> {
    let client = Client::builder()
        .timeout(settings.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let base_url = settings
        .base_url
        .clone()
        .unwrap_or_else(|| settings.kind.default_base_url().to_string());

    debug!(provider = %settings.kind, base_url = %base_url, "Building LLM provider");

    let provider: Arc<dyn LlmProvider> = match settings.kind {
        ProviderKind::Ollama => Arc::new(
            OllamaProvider::new()
                .with_client(client)
                .with_base_url(base_url),
        ),
        kind @ (ProviderKind::Cerebras | ProviderKind::OpenRouter) => {
            let api_key = settings
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| TexplainError::MissingApiKey {
                    provider: kind.to_string(),
                    env_var: kind.api_key_env().unwrap_or_default().to_string(),
                })?;
            Arc::new(
                OpenAiCompatProvider::new(kind.as_str(), api_key)
                    .with_client(client)
                    .with_base_url(base_url),
            )
        }
    };

    Ok(provider)
}
