//! Bounded retry with a fixed delay between attempts.
//!
//! Every error is considered retryable; the caller decides what to do once
//! the attempts run out.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Fixed pause between attempts. Does not grow.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Same attempt count as the default, no sleeping. Meant for tests.
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Attempt count actually used; a policy never tries fewer than once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Execute an async operation with retry logic.
///
/// The `operation` closure is called repeatedly until it succeeds or the
/// policy's attempts are exhausted, in which case the last error is returned.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("{} succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= attempts => {
                tracing::warn!("{} failed after {} attempts: {:#}", label, attempts, e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    "{} error on attempt {}/{}: {:#}",
                    label,
                    attempt,
                    attempts,
                    e
                );
            }
        }

        if !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
        attempt += 1;
    }
}
