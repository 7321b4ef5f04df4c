//! Adaptive ranking.
//!
//! [`AdaptiveRanker`] wraps a [`ContextualRanker`] and ranks with the latest
//! committed weight snapshot, passed as an explicit parameter. Feedback and
//! recalculation requests go to a background [`worker::RecalculationWorker`]
//! over a bounded channel; the ranking path never blocks on either.

pub mod adjustments;
pub mod feedback;
pub mod snapshot;
pub mod worker;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sift_core::config::AdaptiveConfig;
use sift_core::errors::RankingError;
use sift_core::models::{CodeContext, FusedResult, InteractionRecord, Query};
use sift_core::traits::IFeedbackStore;
use sift_core::Intent;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::ranking::{ContextualRanker, IntentWeights, Ranker};

pub use snapshot::WeightSnapshot;
pub use worker::{RecalculationWorker, WorkerMessage};

pub struct AdaptiveRanker {
    base: Arc<ContextualRanker>,
    snapshot: Arc<WeightSnapshot>,
    sender: mpsc::Sender<WorkerMessage>,
    queries: AtomicU64,
    recalc_every: u64,
}

impl AdaptiveRanker {
    /// Build the ranker and spawn its worker on the current Tokio runtime.
    pub fn spawn(
        base: Arc<ContextualRanker>,
        config: &AdaptiveConfig,
        store: Option<Arc<dyn IFeedbackStore>>,
    ) -> Result<Self, RankingError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| RankingError::Failed {
            reason: format!("adaptive ranker needs a tokio runtime: {e}"),
        })?;

        let table = base.weight_table().clone();
        let snapshot = Arc::new(WeightSnapshot::new(table.clone()));
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
        let worker = RecalculationWorker::new(config, table, Arc::clone(&snapshot), store);
        runtime.spawn(worker.run(receiver));

        Ok(Self {
            base,
            snapshot,
            sender,
            queries: AtomicU64::new(0),
            recalc_every: config.recalc_every_queries,
        })
    }

    pub fn snapshot(&self) -> &WeightSnapshot {
        &self.snapshot
    }

    pub fn queries_ranked(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Ask the worker to recalculate now. False when the channel is full or closed.
    pub fn request_recalculation(&self) -> bool {
        self.sender.try_send(WorkerMessage::Recalculate).is_ok()
    }
}

impl Ranker for AdaptiveRanker {
    fn rank(
        &self,
        query: &Query,
        results: Vec<FusedResult>,
        context: &CodeContext,
        intent: Intent,
    ) -> Result<Vec<FusedResult>, RankingError> {
        let weights = self.snapshot.load().get(intent);
        let ranked = self
            .base
            .rank_with_weights(query, results, context, intent, &weights);

        let count = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        if self.recalc_every > 0 && count % self.recalc_every == 0 && !self.request_recalculation() {
            debug!(queries = count, "recalculation already pending");
        }
        ranked
    }

    fn weights_for(&self, intent: Intent) -> IntentWeights {
        self.snapshot.load().get(intent)
    }

    fn record_feedback(&self, record: InteractionRecord) -> bool {
        match self.sender.try_send(WorkerMessage::Feedback(Box::new(record))) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("feedback channel full, dropping record");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("feedback worker stopped, dropping record");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use sift_core::config::RankingConfig;
    use sift_core::models::{Factor, FactorValues, InteractionOutcome};

    use super::*;
    use crate::patterns::PatternRegistry;

    fn base() -> Arc<ContextualRanker> {
        Arc::new(ContextualRanker::new(
            RankingConfig::default(),
            Arc::new(PatternRegistry::new()),
        ))
    }

    fn feedback() -> InteractionRecord {
        let mut strong = [0.1; Factor::COUNT];
        strong[Factor::TextRelevance.index()] = 1.0;
        InteractionRecord {
            query: "fix crash".into(),
            intent: Intent::Debug,
            results_shown: vec![
                ("a".into(), FactorValues(strong)),
                ("b".into(), FactorValues([0.1; Factor::COUNT])),
            ],
            results_selected: vec!["a".into()],
            context: None,
            outcome: InteractionOutcome::Accepted,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn feedback_eventually_shifts_weights() {
        let config = AdaptiveConfig {
            enabled: true,
            min_feedback: 3,
            ..Default::default()
        };
        let ranker = AdaptiveRanker::spawn(base(), &config, None).unwrap();
        let before = ranker.weights_for(Intent::Debug);

        for _ in 0..3 {
            assert!(ranker.record_feedback(feedback()));
        }
        assert!(ranker.request_recalculation());

        for _ in 0..50 {
            if ranker.snapshot().version() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ranker.snapshot().version(), 1);
        let after = ranker.weights_for(Intent::Debug);
        assert!(after.get(Factor::TextRelevance) > before.get(Factor::TextRelevance));
    }

    #[tokio::test]
    async fn ranking_counts_queries() {
        let ranker = AdaptiveRanker::spawn(base(), &AdaptiveConfig::default(), None).unwrap();
        let ranked = ranker
            .rank(
                &Query::new("q"),
                Vec::new(),
                &CodeContext::default(),
                Intent::Understand,
            )
            .unwrap();
        assert!(ranked.is_empty());
        assert_eq!(ranker.queries_ranked(), 1);
    }

    #[test]
    fn spawn_outside_runtime_is_an_error() {
        assert!(AdaptiveRanker::spawn(base(), &AdaptiveConfig::default(), None).is_err());
    }
}
