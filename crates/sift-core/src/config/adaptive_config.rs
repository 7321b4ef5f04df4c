use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Feedback-driven weight adaptation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Wrap the contextual ranker with the adaptive ranker.
    pub enabled: bool,
    /// EMA learning rate in (0, 1].
    pub learning_rate: f64,
    /// Absolute bound on any factor's adjustment.
    pub max_adjustment: f64,
    /// Bound on how far one recalculation may move an adjustment.
    pub max_step: f64,
    /// Request a recalculation every N ranked queries.
    pub recalc_every_queries: u64,
    /// Recalculate on this wall-clock interval as well.
    pub recalc_interval_secs: u64,
    /// Minimum buffered feedback records for an intent before it is recalculated.
    pub min_feedback: usize,
    /// Capacity of the channel feeding the background worker.
    pub channel_capacity: usize,
    /// Maximum records held by the worker between recalculations.
    pub buffer_capacity: usize,
}

impl AdaptiveConfig {
    pub fn recalc_interval(&self) -> Duration {
        Duration::from_secs(self.recalc_interval_secs)
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_ADAPTIVE_ENABLED,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            max_adjustment: defaults::DEFAULT_MAX_ADJUSTMENT,
            max_step: defaults::DEFAULT_MAX_STEP,
            recalc_every_queries: defaults::DEFAULT_RECALC_EVERY_QUERIES,
            recalc_interval_secs: defaults::DEFAULT_RECALC_INTERVAL_SECS,
            min_feedback: defaults::DEFAULT_MIN_FEEDBACK,
            channel_capacity: defaults::DEFAULT_FEEDBACK_CHANNEL_CAPACITY,
            buffer_capacity: defaults::DEFAULT_FEEDBACK_BUFFER_CAPACITY,
        }
    }
}
