pub mod engine;
pub mod gateway;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod reply;
pub mod retry;

pub use engine::{ReasoningEngine, ReasoningRun};
pub use gateway::ModelGateway;
pub use llm::{BackendError, LlmClient};
pub use reply::{NextAction, ParseOutcome, StructuredReply};
pub use retry::RetryPolicy;
