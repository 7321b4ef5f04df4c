//! Metrics registry.
//!
//! [`MetricsCollector`] owns the retrieval metrics and the ranking monitor.

pub mod ranking_monitor;
pub mod retrieval_metrics;

pub use ranking_monitor::{RankingMonitor, ScoreDistribution};
pub use retrieval_metrics::RetrievalMetrics;

use serde::Serialize;

/// Registry owning all collectors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsCollector {
    pub retrieval: RetrievalMetrics,
    pub ranking: RankingMonitor,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monitor_window(window: usize) -> Self {
        Self {
            retrieval: RetrievalMetrics::new(),
            ranking: RankingMonitor::new(window),
        }
    }

    /// Reset all metrics (useful for testing or periodic rotation).
    pub fn reset(&mut self) {
        self.retrieval = RetrievalMetrics::new();
        self.ranking.clear();
    }
}
