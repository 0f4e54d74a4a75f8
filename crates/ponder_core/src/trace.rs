//! Reasoning trace types shared between the engine and its front ends.

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Label used for the closing record of every run.
pub const FINAL_ANSWER_LABEL: &str = "Final Answer";

/// One rendered unit of reasoning progress. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub label: String,
    pub content: String,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs_f64")]
    pub elapsed: Duration,
}

impl StepRecord {
    pub fn new(label: impl Into<String>, content: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            elapsed,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn is_final(&self) -> bool {
        self.label == FINAL_ANSWER_LABEL
    }
}

/// Snapshot handed to the caller after every gateway call.
///
/// `steps` is the full list accumulated so far, not a delta. `total_elapsed`
/// is only present on the last snapshot of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub steps: Vec<StepRecord>,
    #[serde(rename = "total_elapsed_secs", serialize_with = "opt_as_secs_f64")]
    pub total_elapsed: Option<Duration>,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.total_elapsed.is_some()
    }

    /// The closing answer, once the run has finished.
    pub fn final_answer(&self) -> Option<&StepRecord> {
        if !self.is_complete() {
            return None;
        }
        self.steps.last().filter(|s| s.is_final())
    }
}

fn as_secs_f64<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn opt_as_secs_f64<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&d.as_secs_f64()),
        None => s.serialize_none(),
    }
}
