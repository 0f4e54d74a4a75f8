use anyhow::Result;
use async_trait::async_trait;
use ponder_core::Message;

/// Failures a chat backend can report. All of them are treated as transient
/// by the gateway and retried.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("response body had no message content")]
    MalformedBody,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full transcript and return the assistant's raw reply text.
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
