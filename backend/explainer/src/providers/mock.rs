use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use texplain_core::{LlmProvider, LlmRequest, LlmResponse, TexplainError};

/// A mock LLM provider that returns canned responses and records calls.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Every call fails with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(req.clone());
        }

        if let Some(message) = &self.failure {
            return Err(TexplainError::LlmError {
                provider: self.name.clone(),
                message: message.clone(),
            }
            .into());
        }

        Ok(LlmResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
