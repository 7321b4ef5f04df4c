use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failure classes driving retry and circuit-breaker decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transient network/rate-limit failure, eligible for backoff retry.
    Retryable,
    /// Client or configuration failure, never retried.
    NonRetryable,
    /// Deadline exhausted.
    Timeout,
    /// Breaker tripped; the call was not attempted.
    CircuitOpen,
}

/// HTTP statuses treated as transient.
pub const RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Errors raised by search-index, vector and fallback clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("circuit open for {component}")]
    CircuitOpen { component: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("stage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl SearchError {
    /// Classify this error into the retry taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http { status, .. } if RETRYABLE_STATUS_CODES.contains(status) => {
                ErrorKind::Retryable
            }
            Self::Http { .. } => ErrorKind::NonRetryable,
            Self::Transport { .. } => ErrorKind::Retryable,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::CircuitOpen { .. } => ErrorKind::CircuitOpen,
            Self::InvalidRequest { .. } | Self::Unavailable { .. } => ErrorKind::NonRetryable,
        }
    }

    /// Whether another attempt may succeed. Timeouts of a single attempt are retryable
    /// as long as the overall deadline still has budget.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Retryable | ErrorKind::Timeout)
    }

    /// Whether this failure should count against a circuit breaker.
    pub fn trips_breaker(&self) -> bool {
        matches!(self.kind(), ErrorKind::Retryable | ErrorKind::Timeout)
    }
}
