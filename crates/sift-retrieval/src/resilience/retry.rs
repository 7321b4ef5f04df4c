//! Deadline-aware retry with backoff.
//!
//! The remaining budget is recomputed before every attempt. An attempt is
//! bounded by that budget, and a retry whose backoff would sleep past the
//! deadline fails with [`SearchError::Timeout`] instead.

use std::future::Future;
use std::time::Duration;

use sift_core::config::ResilienceConfig;
use sift_core::errors::SearchError;
use tokio::time::Instant;
use tracing::debug;

use super::backoff::Backoff;

/// Absolute point in time by which work must finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// The earlier of two deadlines.
    pub fn min(self, other: Option<Deadline>) -> Self {
        match other {
            Some(other) if other.at < self.at => other,
            _ => self,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::new(
            config.max_attempts,
            Backoff::new(config.base_delay(), config.max_delay()),
        )
    }

    /// Single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1, Backoff::new(Duration::ZERO, Duration::ZERO))
    }
}

/// Run `op` until it succeeds, fails non-retryably, exhausts attempts, or
/// runs out of deadline. `op` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    deadline: Deadline,
    mut op: F,
) -> Result<T, SearchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let started = Instant::now();
    let mut attempt = 0u32;

    loop {
        let budget = deadline.remaining();
        if budget.is_zero() {
            return Err(SearchError::Timeout {
                elapsed: started.elapsed(),
            });
        }

        attempt += 1;
        let outcome = match tokio::time::timeout(budget, op(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout {
                elapsed: started.elapsed(),
            }),
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() || attempt >= policy.max_attempts {
            return Err(err);
        }

        let delay = policy.backoff.delay(attempt - 1);
        if delay >= deadline.remaining() {
            debug!(attempt, error = %err, "retry would pass the deadline");
            return Err(SearchError::Timeout {
                elapsed: started.elapsed(),
            });
        }

        debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying");
        tokio::time::sleep(delay).await;
    }
}
