//! Ollama chat provider.
//!
//! Ollama exposes an OpenAI-compatible API at localhost:11434/v1; the same
//! client works against any endpoint that speaks that dialect.

use crate::llm::{BackendError, LlmClient};
use anyhow::{Context, Result};
use ponder_core::config::LlmConfig;
use ponder_core::Message;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OllamaClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Self::new(base_url, config.api_key.clone(), config.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn build_payload(model: &str, messages: &[Message]) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "stream": false,
    })
}

/// Pull the assistant text out of a non-streaming OpenAI-compatible response.
pub(crate) fn parse_chat_response(resp_json: &Value) -> Result<String, BackendError> {
    resp_json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(BackendError::MalformedBody)
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        let mut request = self
            .client
            .post(self.endpoint())
            .json(&build_payload(model, messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("Ollama request: model={} messages={}", model, messages.len());
        let response = request.send().await.map_err(BackendError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body }.into());
        }

        let resp_json: Value = response.json().await.map_err(BackendError::from)?;
        Ok(parse_chat_response(&resp_json)?)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
