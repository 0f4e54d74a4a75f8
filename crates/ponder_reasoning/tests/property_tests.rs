//! Property-based tests for reply parsing and run termination.
//!
//! Parsing must never panic and must always leave content populated; any
//! scripted backend, however badly behaved, must lead to a finished run.

use anyhow::Result;
use async_trait::async_trait;
use ponder_core::Message;
use ponder_reasoning::reply::{parse_reply, ParseOutcome};
use ponder_reasoning::{LlmClient, ModelGateway, ReasoningEngine, RetryPolicy};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::Mutex;

// ============================================================================
// Parse Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// **Never panics** on arbitrary Unicode strings.
    #[test]
    fn parse_never_panics(s in "\\PC{0,500}") {
        let _ = parse_reply(&s);
    }

    /// **Raw keeps the body**: a fallback reply carries the original text verbatim.
    #[test]
    fn raw_fallback_preserves_body(s in "\\PC{0,300}") {
        if let ParseOutcome::Raw(body) = parse_reply(&s) {
            prop_assert_eq!(&body, &s);
            let reply = ParseOutcome::Raw(body).into_reply();
            prop_assert_eq!(reply.title.as_deref(), Some("Response"));
            prop_assert_eq!(&reply.content, &s);
        }
    }

    /// **Structured content survives**: any string placed in `content` comes back unchanged.
    #[test]
    fn structured_content_roundtrips(title in "\\PC{0,40}", content in "\\PC{0,200}") {
        let body = serde_json::json!({"title": title, "content": content}).to_string();
        let reply = parse_reply(&body).into_reply();
        prop_assert_eq!(reply.title.as_deref(), Some(title.as_str()));
        prop_assert_eq!(reply.content, content);
    }
}

// ============================================================================
// Termination Properties
// ============================================================================

/// One scripted backend reaction.
#[derive(Debug, Clone)]
enum Reaction {
    Continue,
    Finish,
    Plain,
    Fail,
}

struct ScriptClient {
    script: Mutex<Vec<Reaction>>,
}

#[async_trait]
impl LlmClient for ScriptClient {
    async fn chat(&self, _model: &str, _messages: &[Message]) -> Result<String> {
        let reaction = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Reaction::Continue
            } else {
                script.remove(0)
            }
        };
        match reaction {
            Reaction::Continue => Ok(r#"{"title":"t","content":"c","next_action":"continue"}"#.into()),
            Reaction::Finish => Ok(r#"{"title":"t","content":"c","next_action":"final_answer"}"#.into()),
            Reaction::Plain => Ok("just text".into()),
            Reaction::Fail => anyhow::bail!("boom"),
        }
    }

    fn name(&self) -> &str {
        "script"
    }
}

fn reaction() -> impl Strategy<Value = Reaction> {
    prop_oneof![
        4 => Just(Reaction::Continue),
        1 => Just(Reaction::Finish),
        2 => Just(Reaction::Plain),
        2 => Just(Reaction::Fail),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Always terminates**: the last snapshot is complete, ends in a final answer,
    /// and stepping never exceeds the ceiling plus one.
    #[test]
    fn run_always_terminates(
        script in proptest::collection::vec(reaction(), 0..40),
        max_steps in 0u32..30,
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let client = Arc::new(ScriptClient { script: Mutex::new(script) });
        let engine = ReasoningEngine::new(
            ModelGateway::new(client, "m", RetryPolicy::immediate()),
            max_steps,
        );

        let snapshots = rt.block_on(async {
            let mut run = engine.run("q");
            let mut out = Vec::new();
            while let Some(p) = run.next_progress().await {
                out.push(p);
            }
            out
        });

        let last = snapshots.last().unwrap();
        prop_assert!(last.is_complete());
        prop_assert_eq!(last.steps.last().unwrap().label.as_str(), "Final Answer");
        let stepping = last.steps.len() - 1;
        prop_assert!(stepping >= 1);
        prop_assert!(stepping as u32 <= max_steps + 1);
        prop_assert_eq!(snapshots.len(), last.steps.len());
        prop_assert_eq!(
            snapshots.iter().filter(|p| p.is_complete()).count(),
            1
        );
    }
}
