//! Bounded retry with a fixed delay
//!
//! Used for reads that are flaky right after a session comes up (the group
//! listing). Unlike per-recipient sends, exhaustion is loud: the last error
//! is handed back to the caller unchanged.

use crate::pacing::Delay;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    3_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay_ms: delay.as_millis() as u64,
        }
    }

    /// Wait between attempts
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Error type for retry operations
#[derive(Debug)]
pub struct RetryError<E> {
    /// The last error encountered, as the operation returned it
    pub last_error: E,
    /// Total number of attempts made
    pub attempts: u32,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "operation failed after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Execute an async operation, retrying every failure after a fixed delay
///
/// A `max_attempts` of 0 is treated as 1.
pub async fn retry_with_fixed_delay<T, E, F, Fut>(
    config: &RetryConfig,
    delay: &dyn Delay,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = config.delay_ms,
                    error = %e,
                    "Operation failed, retrying"
                );
                delay.sleep(config.delay()).await;
                attempt += 1;
            }
            Err(e) => {
                debug!(attempt, error = %e, "Operation failed, no more retries");
                return Err(RetryError {
                    last_error: e,
                    attempts: attempt,
                });
            }
        }
    }
}
