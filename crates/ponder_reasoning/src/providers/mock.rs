//! Mock LLM provider: deterministic responses for running without a model server.

use crate::llm::LlmClient;
use anyhow::Result;
use ponder_core::{Message, Role};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct MockProvider {
    script: Vec<String>,
    calls: AtomicUsize,
    latency: Duration,
}

impl MockProvider {
    /// Replay `script` one body per reasoning turn. The entry is chosen by
    /// how many assistant turns follow the seeded acknowledgment, so every
    /// run starts from the top. Past the end, calls answer with a
    /// final-answer reply.
    pub fn new(script: Vec<String>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            latency: Duration::from_millis(200),
        }
    }

    /// A short canned three-step session.
    pub fn demo() -> Self {
        let step = |title: &str, content: &str, next: &str| {
            json!({"title": title, "content": content, "next_action": next}).to_string()
        };
        Self::new(vec![
            step(
                "Understanding the question",
                "Restate the request and list what is known.",
                "continue",
            ),
            step(
                "Working it through",
                "Break the problem into parts and solve each one.",
                "continue",
            ),
            step(
                "Checking the result",
                "Re-examine each part for mistakes before answering.",
                "final_answer",
            ),
        ])
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Assistant turns after the acknowledgment that closes the seed.
fn turn_index(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count()
        .saturating_sub(1)
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index = turn_index(messages);
        let body = self.script.get(index).cloned().unwrap_or_else(|| {
            json!({
                "title": "Answer",
                "content": format!(
                    "(Mock {} Response) I received a transcript of {} messages.",
                    model,
                    messages.len()
                ),
                "next_action": "final_answer",
            })
            .to_string()
        });
        Ok(body)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
