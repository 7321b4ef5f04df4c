//! Closed / Open / HalfOpen circuit breaker.
//!
//! Opens after `failure_threshold` consecutive failures, rejects calls for
//! `cooldown`, then lets one trial through at a time. `success_threshold`
//! trial successes close it again; any trial failure reopens it. A trial that
//! never reports back stops blocking others after another `cooldown`.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_core::config::ResilienceConfig;
use sift_observability::tracing_setup::events;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    trial_successes: u32,
    opened_at: Option<Instant>,
    trial_started: Option<Instant>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    component: String,
    failure_threshold: u32,
    success_threshold: u32,
    cooldown: Duration,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(
        component: impl Into<String>,
        failure_threshold: u32,
        success_threshold: u32,
        cooldown: Duration,
    ) -> Self {
        Self {
            component: component.into(),
            failure_threshold: failure_threshold.max(1),
            success_threshold: success_threshold.max(1),
            cooldown,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                trial_successes: 0,
                opened_at: None,
                trial_started: None,
            }),
        }
    }

    pub fn from_config(component: impl Into<String>, config: &ResilienceConfig) -> Self {
        Self::new(
            component,
            config.failure_threshold,
            config.half_open_successes,
            config.cooldown(),
        )
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a call may proceed. Moves Open → HalfOpen once the cooldown
    /// elapsed; in HalfOpen only one trial is in flight at a time. An admitted
    /// caller must report back through `record_success`, `record_failure` or
    /// `release_trial`.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let free = inner
                    .trial_started
                    .map_or(true, |at| at.elapsed() >= self.cooldown);
                if free {
                    inner.trial_started = Some(Instant::now());
                }
                free
            }
            CircuitState::Open => {
                let cooled = inner
                    .opened_at
                    .map_or(true, |at| at.elapsed() >= self.cooldown);
                if cooled {
                    debug!(component = %self.component, "circuit half-open");
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_successes = 0;
                    inner.trial_started = Some(Instant::now());
                }
                cooled
            }
        }
    }

    /// End an in-flight trial without counting it either way.
    pub fn release_trial(&self) {
        self.lock().trial_started = None;
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::HalfOpen => {
                inner.trial_started = None;
                inner.trial_successes += 1;
                if inner.trial_successes >= self.success_threshold {
                    debug!(component = %self.component, "circuit closed");
                    *inner = closed();
                }
            }
            _ => inner.consecutive_failures = 0,
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    self.open(&mut inner);
                }
            }
            CircuitState::HalfOpen => {
                inner.consecutive_failures += 1;
                self.open(&mut inner);
            }
            CircuitState::Open => {}
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn reset(&self) {
        *self.lock() = closed();
    }

    fn open(&self, inner: &mut BreakerState) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.trial_successes = 0;
        inner.trial_started = None;
        events::circuit_opened(&self.component, inner.consecutive_failures);
    }
}

fn closed() -> BreakerState {
    BreakerState {
        state: CircuitState::Closed,
        consecutive_failures: 0,
        trial_successes: 0,
        opened_at: None,
        trial_started: None,
    }
}
