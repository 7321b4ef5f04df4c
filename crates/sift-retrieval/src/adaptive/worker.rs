//! Background weight recalculation.
//!
//! The worker owns the feedback buffer and adjustment state. It wakes on a
//! message or on a fixed interval, recalculates intents that have gathered
//! at least `min_feedback` records, and publishes a new snapshot. The ranking
//! path only ever sends to its bounded channel.
//!
//! On start the buffer is seeded from the feedback store's recent history, so
//! a restarted process picks up where it left off. Store calls are synchronous
//! and run on the blocking pool.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use sift_core::config::AdaptiveConfig;
use sift_core::models::InteractionRecord;
use sift_core::traits::IFeedbackStore;
use sift_core::Intent;
use sift_observability::tracing_setup::events;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::adjustments::{AdjustmentBounds, AdjustmentState};
use super::feedback::factor_signals;
use super::snapshot::WeightSnapshot;
use crate::ranking::WeightTable;

#[derive(Debug)]
pub enum WorkerMessage {
    Feedback(Box<InteractionRecord>),
    Recalculate,
}

pub struct RecalculationWorker {
    snapshot: Arc<WeightSnapshot>,
    state: AdjustmentState,
    buffer: VecDeque<InteractionRecord>,
    store: Option<Arc<dyn IFeedbackStore>>,
    min_feedback: usize,
    buffer_capacity: usize,
    interval: Duration,
}

impl RecalculationWorker {
    pub fn new(
        config: &AdaptiveConfig,
        base: WeightTable,
        snapshot: Arc<WeightSnapshot>,
        store: Option<Arc<dyn IFeedbackStore>>,
    ) -> Self {
        Self {
            snapshot,
            state: AdjustmentState::new(base, AdjustmentBounds::from_config(config)),
            buffer: VecDeque::new(),
            store,
            min_feedback: config.min_feedback.max(1),
            buffer_capacity: config.buffer_capacity.max(1),
            interval: config.recalc_interval().max(Duration::from_millis(1)),
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Buffer a record for the next recalculation, evicting the oldest when full.
    pub fn accept(&mut self, record: InteractionRecord) {
        if self.buffer.len() == self.buffer_capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(record);
    }

    /// Apply every intent with enough buffered feedback. Consumed records
    /// leave the buffer. Returns the number of intents updated.
    pub fn recalculate(&mut self) -> usize {
        let mut updated: Vec<(Intent, usize)> = Vec::new();
        for intent in Intent::ALL {
            let count = self.buffer.iter().filter(|r| r.intent == intent).count();
            if count < self.min_feedback {
                continue;
            }
            if let Some(signal) = factor_signals(self.buffer.iter().filter(|r| r.intent == intent)) {
                self.state.apply(intent, &signal);
                updated.push((intent, count));
            }
            self.buffer.retain(|r| r.intent != intent);
        }

        if updated.is_empty() {
            debug!(buffered = self.buffer.len(), "not enough feedback to recalculate");
            return 0;
        }
        let version = self.snapshot.store(self.state.table());
        for (intent, count) in &updated {
            events::weights_recalculated(intent.as_str(), version, *count);
        }
        updated.len()
    }

    /// Load each intent's recent history from the store into the buffer.
    /// Returns the number of records loaded.
    pub async fn seed(&mut self) -> usize {
        let Some(store) = self.store.clone() else {
            return 0;
        };
        let limit = (self.buffer_capacity / Intent::COUNT).max(1);
        let loaded = tokio::task::spawn_blocking(move || {
            let mut history = Vec::new();
            for intent in Intent::ALL {
                match store.recent(intent, limit) {
                    Ok(records) => history.extend(records.into_iter().rev()),
                    Err(err) => warn!(intent = %intent, error = %err, "feedback history unavailable"),
                }
            }
            history
        })
        .await;

        let history = match loaded {
            Ok(history) => history,
            Err(err) => {
                warn!(error = %err, "feedback history task failed");
                return 0;
            }
        };
        let count = history.len();
        for record in history {
            self.accept(record);
        }
        debug!(records = count, "seeded feedback buffer");
        count
    }

    async fn persist(&self, record: &InteractionRecord) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let record = record.clone();
        match tokio::task::spawn_blocking(move || store.record(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "feedback store rejected record"),
            Err(err) => warn!(error = %err, "feedback store task failed"),
        }
    }

    pub async fn run(mut self, mut receiver: mpsc::Receiver<WorkerMessage>) {
        self.seed().await;
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                message = receiver.recv() => match message {
                    Some(WorkerMessage::Feedback(record)) => {
                        self.persist(&record).await;
                        self.accept(*record);
                    }
                    Some(WorkerMessage::Recalculate) => {
                        self.recalculate();
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    self.recalculate();
                }
            }
        }
        debug!("weight recalculation worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sift_core::models::{Factor, FactorValues, InteractionOutcome};

    use super::*;

    fn record(intent: Intent) -> InteractionRecord {
        let mut strong = [0.2; Factor::COUNT];
        strong[Factor::QualityScore.index()] = 0.9;
        InteractionRecord {
            query: "q".into(),
            intent,
            results_shown: vec![
                ("a".into(), FactorValues(strong)),
                ("b".into(), FactorValues([0.2; Factor::COUNT])),
            ],
            results_selected: vec!["a".into()],
            context: None,
            outcome: InteractionOutcome::Accepted,
            timestamp: Utc::now(),
        }
    }

    fn worker(min_feedback: usize) -> RecalculationWorker {
        worker_with_store(min_feedback, None)
    }

    fn worker_with_store(
        min_feedback: usize,
        store: Option<Arc<dyn IFeedbackStore>>,
    ) -> RecalculationWorker {
        let config = AdaptiveConfig {
            min_feedback,
            ..Default::default()
        };
        RecalculationWorker::new(
            &config,
            WeightTable::default(),
            Arc::new(WeightSnapshot::new(WeightTable::default())),
            store,
        )
    }

    struct HistoryStore(Vec<InteractionRecord>);

    impl IFeedbackStore for HistoryStore {
        fn record(&self, _record: &InteractionRecord) -> sift_core::errors::SiftResult<()> {
            Ok(())
        }

        fn recent(
            &self,
            intent: Intent,
            limit: usize,
        ) -> sift_core::errors::SiftResult<Vec<InteractionRecord>> {
            Ok(self
                .0
                .iter()
                .filter(|r| r.intent == intent)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[test]
    fn below_threshold_is_a_no_op() {
        let mut worker = worker(3);
        worker.accept(record(Intent::Test));
        worker.accept(record(Intent::Test));
        assert_eq!(worker.recalculate(), 0);
        assert_eq!(worker.snapshot.version(), 0);
        assert_eq!(worker.buffered(), 2);
    }

    #[test]
    fn threshold_met_publishes_new_weights() {
        let mut worker = worker(2);
        worker.accept(record(Intent::Test));
        worker.accept(record(Intent::Test));
        worker.accept(record(Intent::Debug));
        assert_eq!(worker.recalculate(), 1);
        assert_eq!(worker.snapshot.version(), 1);
        assert_eq!(worker.buffered(), 1);

        let table = worker.snapshot.load();
        let base = WeightTable::default();
        assert!(
            table.get(Intent::Test).get(Factor::QualityScore)
                > base.get(Intent::Test).get(Factor::QualityScore)
        );
        assert_eq!(table.get(Intent::Debug), base.get(Intent::Debug));
    }

    #[tokio::test]
    async fn history_seeds_the_buffer() {
        let store: Arc<dyn IFeedbackStore> = Arc::new(HistoryStore(vec![
            record(Intent::Test),
            record(Intent::Test),
            record(Intent::Debug),
        ]));
        let mut worker = worker_with_store(2, Some(store));
        assert_eq!(worker.seed().await, 3);
        assert_eq!(worker.recalculate(), 1);
        assert_eq!(worker.snapshot.version(), 1);
    }

    #[tokio::test]
    async fn seeding_without_a_store_is_a_no_op() {
        let mut worker = worker(2);
        assert_eq!(worker.seed().await, 0);
        assert_eq!(worker.buffered(), 0);
    }
}
