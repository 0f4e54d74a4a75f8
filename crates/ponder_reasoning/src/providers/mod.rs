pub mod mock;
pub mod ollama;

pub use mock::MockProvider;
pub use ollama::OllamaClient;

use crate::llm::LlmClient;
use anyhow::Result;
use ponder_core::config::LlmConfig;
use std::sync::Arc;

/// Build the chat backend named by `config.provider`.
pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    match config.provider.as_str() {
        "ollama" | "openai" => Ok(Arc::new(OllamaClient::from_config(config)?)),
        "mock" => Ok(Arc::new(MockProvider::demo())),
        other => anyhow::bail!("Unknown LLM provider: {}", other),
    }
}
