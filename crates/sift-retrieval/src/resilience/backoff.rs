//! Capped exponential backoff with full jitter.

use std::time::Duration;

use rand::Rng;

/// Delay calculator: `rand(0 ..= min(base * 2^attempt, max))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    jitter: bool,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            jitter: true,
        }
    }

    /// Disable jitter; delays become the deterministic capped exponential.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Upper bound of the delay before the given 0-based retry.
    pub fn capped(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis();
        let max_ms = self.max.as_millis();
        let multiplier = 1u128.checked_shl(attempt.min(63)).unwrap_or(u128::MAX);
        let capped = base_ms.saturating_mul(multiplier).min(max_ms);
        Duration::from_millis(capped.min(u64::MAX as u128) as u64)
    }

    /// Delay before the given 0-based retry.
    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self.capped(attempt);
        if !self.jitter {
            return capped;
        }
        let capped_ms = capped.as_millis().min(u64::MAX as u128) as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=capped_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_cap() {
        let backoff =
            Backoff::new(Duration::from_millis(100), Duration::from_millis(500)).without_jitter();
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(200));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(3), Duration::from_millis(500));
        assert_eq!(backoff.delay(200), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_cap() {
        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_millis(2_000));
        for attempt in 0..8 {
            assert!(backoff.delay(attempt) <= backoff.capped(attempt));
        }
    }
}
