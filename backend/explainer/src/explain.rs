use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use texplain_core::{LlmProvider, LlmRequest, LlmResponse};

/// Text placed before the markup in the user prompt.
pub const PROMPT_PREFIX: &str = "Explain this equation to me:";

/// Build the single user-role prompt for a recognized formula.
pub fn build_prompt(latex: &str) -> String {
    format!("{PROMPT_PREFIX}\n\n{latex}")
}

/// Model parameters for the explanation request.
#[derive(Debug, Clone)]
pub struct ExplainSettings {
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub temperature: Option<f32>,
}

/// Asks an LLM provider to explain a formula. One request per call.
pub struct Explainer {
    provider: Arc<dyn LlmProvider>,
    settings: ExplainSettings,
}

impl Explainer {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ExplainSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn request_for(&self, latex: &str) -> LlmRequest {
        LlmRequest {
            model: self.settings.model.clone(),
            system_prompt: self.settings.system_prompt.clone(),
            user_prompt: build_prompt(latex),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    pub async fn explain(&self, latex: &str) -> Result<LlmResponse> {
        let request = self.request_for(latex);
        debug!(
            provider = %self.provider.name(),
            model = %request.model,
            max_tokens = request.max_tokens,
            "Requesting explanation"
        );

        let response = self.provider.complete(&request).await?;

        info!(
            provider = %response.provider,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "Explanation received"
        );
        Ok(response)
    }
}
