use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Turns an image of a formula into LaTeX markup.
#[async_trait]
pub trait FormulaRecognizer: Send + Sync {
    /// Recognizer name (e.g., "pix2tex").
    fn name(&self) -> &str;

    /// Recognize the formula in the image at `image` and return its markup.
    async fn recognize(&self, image: &Path) -> Result<String>;
}

/// Trait for LLM providers used by the explainer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "cerebras", "ollama").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    /// Sent as a system message when non-empty.
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
