//! Structured JSON logging for sift.
//!
//! Filtering follows `EnvFilter` directives read from `SIFT_LOG`, so a single
//! stage can be turned up with e.g. `SIFT_LOG=info,sift_retrieval::search=debug`.
//! Without it sift logs at `info` and keeps cache internals at `warn`.
//!
//! sift is a library: the host may already own the global subscriber. Both
//! initializers therefore use `try_init` and report whether they installed
//! one, instead of panicking on a second install.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

/// Environment variable read by [`init_tracing`].
pub const LOG_ENV_VAR: &str = "SIFT_LOG";

/// Directives used when `SIFT_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "info,moka=warn";

/// Install the JSON subscriber filtered by `SIFT_LOG`. Returns false when a
/// global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init()
        .is_ok()
}

/// Install the JSON subscriber with explicit directives, ignoring `SIFT_LOG`.
pub fn init_tracing_with_filter(directives: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}
