//! Stage resilience: exponential backoff with full jitter, deadline-aware
//! retry, and a per-stage circuit breaker.

pub mod backoff;
pub mod circuit_breaker;
pub mod retry;

pub use backoff::Backoff;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use retry::{retry_with_backoff, Deadline, RetryPolicy};
