//! # sift-observability
//!
//! Structured tracing (JSON output filtered by `SIFT_LOG`), one log function per
//! key pipeline event, retrieval metrics, and a ranking monitor that tracks score
//! distributions and which factor dominates top results.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{MetricsCollector, RankingMonitor, RetrievalMetrics};
