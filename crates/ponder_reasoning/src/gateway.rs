use crate::llm::LlmClient;
use crate::reply::{parse_reply, NextAction, StructuredReply, ERROR_TITLE};
use crate::retry::{with_retry, RetryPolicy};
use ponder_core::Message;
use std::sync::Arc;

/// A single retried exchange with the chat backend.
///
/// Never returns an error: parse failures become plain-text replies and
/// exhausted retries become `Error` replies.
#[derive(Clone)]
pub struct ModelGateway {
    client: Arc<dyn LlmClient>,
    model: String,
    retry: RetryPolicy,
}

impl ModelGateway {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send the transcript and decode the reply.
    ///
    /// A non-final failure carries `final_answer` so the engine stops stepping.
    pub async fn call(&self, transcript: &[Message], finalizing: bool) -> StructuredReply {
        let label = format!("{} ({})", self.client.name(), self.model);
        let result = with_retry(&self.retry, &label, || {
            self.client.chat(&self.model, transcript)
        })
        .await;

        match result {
            Ok(body) => parse_reply(&body).into_reply(),
            Err(e) => {
                let attempts = self.retry.attempts();
                if finalizing {
                    StructuredReply::new(
                        ERROR_TITLE,
                        format!(
                            "Failed to generate final answer after {} attempts. Error: {:#}",
                            attempts, e
                        ),
                    )
                } else {
                    StructuredReply::new(
                        ERROR_TITLE,
                        format!(
                            "Failed to generate step after {} attempts. Error: {:#}",
                            attempts, e
                        ),
                    )
                    .with_next_action(NextAction::FinalAnswer)
                }
            }
        }
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("client", &self.client.name())
            .field("model", &self.model)
            .field("retry", &self.retry)
            .finish()
    }
}
