use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use texplain_core::{LlmProvider, LlmRequest, LlmResponse, ProviderKind, TexplainError};
use texplain_logging::redact_secret;

/// Provider for OpenAI-style `/chat/completions` endpoints (Cerebras, OpenRouter).
pub struct OpenAiCompatProvider {
    name: String,
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client: Client::new(),
            api_key: api_key.into(),
            base_url: ProviderKind::Cerebras.default_base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn chat_request(request: &LlmRequest) -> ChatRequest {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: request.system_prompt.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.user_prompt.clone(),
    });

    ChatRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Pull the first choice's text out of a completion response.
fn first_choice(response: ChatResponse, provider: &str) -> Result<(String, u64)> {
    let tokens_used = response.usage.and_then(|u| u.total_tokens).unwrap_or(0);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TexplainError::EmptyCompletion {
            provider: provider.to_string(),
        })?;
    Ok((choice.message.content.unwrap_or_default(), tokens_used))
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        let body = chat_request(request);

        debug!(provider = %self.name, model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{} HTTP request failed", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TexplainError::LlmError {
                provider: self.name.clone(),
                message: format!(
                    "{}: {}",
                    status,
                    redact_secret(error_body.trim(), Some(&self.api_key))
                ),
            }
            .into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.name))?;

        let model = chat_response
            .model
            .clone()
            .unwrap_or_else(|| request.model.clone());
        let (content, tokens_used) = first_choice(chat_response, &self.name)?;

        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model,
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
