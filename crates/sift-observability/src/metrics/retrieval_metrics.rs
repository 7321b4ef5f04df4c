//! Per-intent hit rate, stage failures, fallbacks, latency, token efficiency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sift_core::{Intent, StageKind};

const UNKNOWN_INTENT: &str = "unknown";

/// Tracks retrieval effectiveness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    /// Per-intent total query counts.
    pub queries_by_intent: HashMap<String, u64>,
    /// Per-intent hit counts (queries that returned at least one result).
    pub hits_by_intent: HashMap<String, u64>,
    /// Failures per stage kind.
    pub stage_failures: HashMap<String, u64>,
    /// Queries where every stage failed and the fallback path ran.
    pub fallbacks: u64,
    /// Queries where ranking failed and fused order was returned.
    pub ranking_fallbacks: u64,
    pub total_latency_ms: u64,
    pub total_tokens_used: u64,
    pub total_tokens_budgeted: u64,
}

impl RetrievalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed query.
    pub fn record_query(
        &mut self,
        intent: Option<Intent>,
        hit: bool,
        latency_ms: u64,
        tokens_used: u64,
        budget: u64,
    ) {
        let key = intent_key(intent);
        *self.queries_by_intent.entry(key.clone()).or_default() += 1;
        if hit {
            *self.hits_by_intent.entry(key).or_default() += 1;
        }
        self.total_latency_ms += latency_ms;
        self.total_tokens_used += tokens_used;
        self.total_tokens_budgeted += budget;
    }

    pub fn record_stage_failure(&mut self, stage: StageKind) {
        *self
            .stage_failures
            .entry(stage.as_str().to_string())
            .or_default() += 1;
    }

    pub fn record_fallback(&mut self) {
        self.fallbacks += 1;
    }

    pub fn record_ranking_fallback(&mut self) {
        self.ranking_fallbacks += 1;
    }

    pub fn total_queries(&self) -> u64 {
        self.queries_by_intent.values().sum()
    }

    /// Hit rate for a specific intent.
    pub fn hit_rate(&self, intent: Intent) -> f64 {
        let key = intent.as_str();
        let queries = self.queries_by_intent.get(key).copied().unwrap_or(0);
        if queries == 0 {
            return 0.0;
        }
        let hits = self.hits_by_intent.get(key).copied().unwrap_or(0);
        hits as f64 / queries as f64
    }

    pub fn stage_failure_count(&self, stage: StageKind) -> u64 {
        self.stage_failures.get(stage.as_str()).copied().unwrap_or(0)
    }

    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            return 0.0;
        }
        self.total_latency_ms as f64 / total as f64
    }

    /// Overall token efficiency (used / budgeted).
    pub fn token_efficiency(&self) -> f64 {
        if self.total_tokens_budgeted == 0 {
            return 0.0;
        }
        self.total_tokens_used as f64 / self.total_tokens_budgeted as f64
    }
}

fn intent_key(intent: Option<Intent>) -> String {
    intent
        .map(|i| i.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_INTENT.into())
}
