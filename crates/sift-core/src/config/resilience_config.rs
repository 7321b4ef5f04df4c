use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Timeout, retry and circuit-breaker settings applied to every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Wall-clock budget for one stage, retries included.
    pub stage_timeout_ms: u64,
    /// Maximum attempts per stage call (first attempt included).
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay_ms: u64,
    /// Cap on a single backoff delay.
    pub max_delay_ms: u64,
    /// Consecutive failures before the breaker opens.
    pub failure_threshold: u32,
    /// Time the breaker stays open before half-opening.
    pub cooldown_ms: u64,
    /// Successes required in half-open state to close.
    pub half_open_successes: u32,
}

impl ResilienceConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_millis(self.stage_timeout_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            stage_timeout_ms: defaults::DEFAULT_STAGE_TIMEOUT_MS,
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_BASE_DELAY_MS,
            max_delay_ms: defaults::DEFAULT_MAX_DELAY_MS,
            failure_threshold: defaults::DEFAULT_FAILURE_THRESHOLD,
            cooldown_ms: defaults::DEFAULT_COOLDOWN_MS,
            half_open_successes: defaults::DEFAULT_HALF_OPEN_SUCCESSES,
        }
    }
}
