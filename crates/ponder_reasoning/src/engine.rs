//! Stepwise reasoning loop.
//!
//! A run seeds a transcript with the directive, the query and an
//! acknowledgment, then asks the model for one reasoning step per gateway
//! call until the model asks for the final answer or the step ceiling is
//! passed. A last call asks for the consolidated answer.
//!
//! Runs are pulled by the caller one [`Progress`] snapshot at a time; every
//! snapshot carries the full step list so far and only the last one carries
//! the total elapsed time.

use crate::gateway::ModelGateway;
use crate::llm::LlmClient;
use crate::prompts::{ACKNOWLEDGMENT, FINAL_ANSWER_REQUEST, SYSTEM_DIRECTIVE};
use crate::retry::RetryPolicy;
use futures_util::stream::{self, Stream};
use ponder_core::config::{PonderConfig, DEFAULT_MAX_STEPS};
use ponder_core::trace::FINAL_ANSWER_LABEL;
use ponder_core::{Message, Progress, StepRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Label used when a step reply carries no title.
const UNTITLED_STEP: &str = "Thinking";

#[derive(Debug, Clone)]
pub struct ReasoningEngine {
    gateway: ModelGateway,
    max_steps: u32,
}

impl ReasoningEngine {
    pub fn new(gateway: ModelGateway, max_steps: u32) -> Self {
        Self { gateway, max_steps }
    }

    pub fn with_client(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self::new(
            ModelGateway::new(client, model, RetryPolicy::default()),
            DEFAULT_MAX_STEPS,
        )
    }

    pub fn from_config(client: Arc<dyn LlmClient>, config: &PonderConfig) -> Self {
        let retry = RetryPolicy::new(
            config.reasoning.retry_attempts,
            config.reasoning.retry_delay(),
        );
        Self::new(
            ModelGateway::new(client, config.llm.model.clone(), retry),
            config.reasoning.max_steps,
        )
    }

    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    /// Takes effect for runs started afterwards.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.gateway.set_model(model);
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }

    /// Start a run for `query`. Nothing is sent until the first pull.
    pub fn run(&self, query: &str) -> ReasoningRun<'_> {
        ReasoningRun::new(&self.gateway, self.max_steps, query)
    }

    /// Drive a whole run and return its final snapshot.
    pub async fn think(&self, query: &str) -> Progress {
        self.run(query).finish().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stepping,
    Finalizing,
    Done,
}

/// One in-flight reasoning session. Owns its transcript and step records.
#[derive(Debug)]
pub struct ReasoningRun<'a> {
    gateway: &'a ModelGateway,
    max_steps: u32,
    transcript: Vec<Message>,
    steps: Vec<StepRecord>,
    step_count: u32,
    total_elapsed: Duration,
    phase: Phase,
}

impl<'a> ReasoningRun<'a> {
    fn new(gateway: &'a ModelGateway, max_steps: u32, query: &str) -> Self {
        Self {
            gateway,
            max_steps,
            transcript: vec![
                Message::system(SYSTEM_DIRECTIVE),
                Message::user(query),
                Message::assistant(ACKNOWLEDGMENT),
            ],
            steps: Vec::new(),
            step_count: 1,
            total_elapsed: Duration::ZERO,
            phase: Phase::Stepping,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Perform the next gateway call and return the updated snapshot, or
    /// `None` once the final answer has been produced.
    pub async fn next_progress(&mut self) -> Option<Progress> {
        match self.phase {
            Phase::Stepping => Some(self.step().await),
            Phase::Finalizing => Some(self.finalize().await),
            Phase::Done => None,
        }
    }

    /// Run to completion and return the final snapshot.
    pub async fn finish(mut self) -> Progress {
        loop {
            match self.phase {
                Phase::Stepping => {
                    self.step().await;
                }
                Phase::Finalizing => return self.finalize().await,
                Phase::Done => return self.snapshot(Some(self.total_elapsed)),
            }
        }
    }

    /// Adapt the run into a stream of snapshots.
    pub fn into_stream(self) -> impl Stream<Item = Progress> + 'a {
        stream::unfold(self, |mut run| async move {
            let progress = run.next_progress().await?;
            Some((progress, run))
        })
    }

    async fn step(&mut self) -> Progress {
        let started = Instant::now();
        let reply = self.gateway.call(&self.transcript, false).await;
        let elapsed = started.elapsed();

        let title = reply.title.as_deref().unwrap_or(UNTITLED_STEP);
        let label = format!("Step {}: {}", self.step_count, title);
        tracing::debug!("{} ({:.2}s)", label, elapsed.as_secs_f64());

        self.steps
            .push(StepRecord::new(label, reply.content.clone(), elapsed));
        self.transcript
            .push(Message::assistant(reply.to_transcript_text()));
        self.total_elapsed += elapsed;

        if reply.wants_final_answer() {
            self.phase = Phase::Finalizing;
        } else if self.step_count > self.max_steps {
            tracing::warn!(
                "Step ceiling ({}) passed without a final answer, forcing one",
                self.max_steps
            );
            self.phase = Phase::Finalizing;
        } else {
            self.step_count += 1;
        }

        self.snapshot(None)
    }

    async fn finalize(&mut self) -> Progress {
        self.transcript.push(Message::user(FINAL_ANSWER_REQUEST));

        let started = Instant::now();
        let reply = self.gateway.call(&self.transcript, true).await;
        let elapsed = started.elapsed();

        self.steps.push(StepRecord::new(
            FINAL_ANSWER_LABEL,
            reply.content.clone(),
            elapsed,
        ));
        self.transcript
            .push(Message::assistant(reply.to_transcript_text()));
        self.total_elapsed += elapsed;
        self.phase = Phase::Done;

        tracing::info!(
            "Reasoning finished: {} steps in {:.2}s",
            self.steps.len(),
            self.total_elapsed.as_secs_f64()
        );
        self.snapshot(Some(self.total_elapsed))
    }

    fn snapshot(&self, total_elapsed: Option<Duration>) -> Progress {
        Progress {
            steps: self.steps.clone(),
            total_elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    fn engine(script: &[&str], max_steps: u32) -> ReasoningEngine {
        let client = MockProvider::new(script.iter().map(|s| s.to_string()).collect())
            .with_latency(Duration::ZERO);
        ReasoningEngine::new(
            ModelGateway::new(Arc::new(client), "test", RetryPolicy::immediate()),
            max_steps,
        )
    }

    #[tokio::test]
    async fn test_transcript_seed() {
        let engine = engine(&[], 25);
        let run = engine.run("what is 6 * 7?");
        let t = run.transcript();
        assert_eq!(t.len(), 3);
        assert_eq!(t[0], Message::system(SYSTEM_DIRECTIVE));
        assert_eq!(t[1], Message::user("what is 6 * 7?"));
        assert_eq!(t[2], Message::assistant(ACKNOWLEDGMENT));
        assert!(run.steps().is_empty());
    }

    #[test]
    fn test_with_client_uses_defaults() {
        let engine = ReasoningEngine::with_client(Arc::new(MockProvider::demo()), "llama3.1");
        assert_eq!(engine.model(), "llama3.1");
        assert_eq!(engine.max_steps(), 25);
        assert_eq!(engine.gateway.retry_policy(), &RetryPolicy::default());
    }

    #[tokio::test]
    async fn test_untitled_step_labelled_thinking() {
        let engine = engine(
            &[r#"{"content": "hmm", "next_action": "final_answer"}"#],
            25,
        );
        let progress = engine.think("q").await;
        assert_eq!(progress.steps[0].label, "Step 1: Thinking");
    }

    #[tokio::test]
    async fn test_finish_after_done_does_not_call_again() {
        let engine = engine(&[], 25);
        let mut run = engine.run("q");
        while run.next_progress().await.is_some() {}
        assert!(run.is_done());
        let steps_before = run.steps().len();
        let progress = run.finish().await;
        assert_eq!(progress.steps.len(), steps_before);
        assert!(progress.is_complete());
    }

    #[tokio::test]
    async fn test_zero_ceiling_allows_one_extra_step() {
        let engine = engine(&["a", "b", "c"], 0);
        let progress = engine.think("q").await;
        // step 1 is > 0 so the first step already triggers finalizing
        assert_eq!(progress.steps.len(), 2);
        assert_eq!(progress.steps[0].label, "Step 1: Response");
        assert_eq!(progress.steps[1].label, "Final Answer");
        assert_eq!(progress.steps[1].content, "b");
    }
}
