//! Capped linear backoff for failed click jobs.

use std::time::Duration;

/// Retry budget and backoff curve applied to failed jobs.
///
/// The delay before retry `n` (starting at 1) is `min(n * base_delay, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Retries allowed after the first attempt; the job is dead-lettered
    /// when one more failure would exceed it.
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_retries,
        }
    }

    /// Delay before the given retry attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt).min(self.max_delay)
    }

    /// Returns true if `attempt` is still within the retry budget.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            max_retries: 10,
        }
    }
}
