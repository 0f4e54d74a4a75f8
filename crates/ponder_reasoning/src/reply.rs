//! Decoding of model replies into structured reasoning steps.
//!
//! The model is asked to answer with a JSON object carrying `title`,
//! `content` and `next_action`. Models do not always comply, so anything that
//! fails the shape check is kept verbatim as a plain-text reply.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Title given to replies whose body was not structured.
pub const RAW_REPLY_TITLE: &str = "Response";
pub const ERROR_TITLE: &str = "Error";

static RE_CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z]*[ \t]*\n?(.*?)\n?```\z").expect("valid fence regex")
});

/// What the model wants to do after this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Continue,
    FinalAnswer,
}

impl NextAction {
    fn from_wire(value: &str) -> Option<Self> {
        match value.trim() {
            "continue" => Some(Self::Continue),
            "final_answer" => Some(Self::FinalAnswer),
            _ => None,
        }
    }
}

/// A single decoded reply from the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextAction>,
}

impl StructuredReply {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: content.into(),
            next_action: None,
        }
    }

    pub fn with_next_action(mut self, action: NextAction) -> Self {
        self.next_action = Some(action);
        self
    }

    /// Fallback for bodies that are not structured data.
    pub fn raw(body: impl Into<String>) -> Self {
        Self::new(RAW_REPLY_TITLE, body)
    }

    pub fn wants_final_answer(&self) -> bool {
        self.next_action == Some(NextAction::FinalAnswer)
    }

    /// Form written back into the transcript as the assistant's turn.
    pub fn to_transcript_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.content.clone())
    }
}

/// Result of decoding a reply body before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Structured(StructuredReply),
    Raw(String),
}

impl ParseOutcome {
    pub fn into_reply(self) -> StructuredReply {
        match self {
            ParseOutcome::Structured(reply) => reply,
            ParseOutcome::Raw(body) => StructuredReply::raw(body),
        }
    }
}

/// Decode a reply body. Never fails: anything that is not an object with a
/// string `content` comes back as [`ParseOutcome::Raw`] holding the original text.
pub fn parse_reply(body: &str) -> ParseOutcome {
    let trimmed = body.trim();
    let candidate = RE_CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str().trim());

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => match shape_check(&value) {
            Some(reply) => ParseOutcome::Structured(reply),
            None => ParseOutcome::Raw(body.to_string()),
        },
        Err(_) => ParseOutcome::Raw(body.to_string()),
    }
}

fn shape_check(value: &Value) -> Option<StructuredReply> {
    let map = value.as_object()?;
    let content = map.get("content")?.as_str()?.to_string();
    let title = map
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);
    let next_action = map
        .get("next_action")
        .or_else(|| map.get("nextAction"))
        .and_then(Value::as_str)
        .and_then(NextAction::from_wire);

    Some(StructuredReply {
        title,
        content,
        next_action,
    })
}
