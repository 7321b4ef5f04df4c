//! Feedback flowing through an adaptive pipeline.

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use sift_core::config::{AdaptiveConfig, RankingConfig, SiftConfig};
use sift_core::errors::SiftResult;
use sift_core::models::{CodeContext, Factor, InteractionOutcome, InteractionRecord, Query};
use sift_core::traits::IFeedbackStore;
use sift_core::Intent;
use sift_retrieval::resilience::RetryPolicy;
use sift_retrieval::{AdaptiveRanker, ContextualRanker, PatternRegistry, Ranker, SearchPipeline};
use test_fixtures::{
    corpus, feedback, vector_hits, InMemorySearchIndex, InMemoryVectorSearch,
    RecordingFeedbackStore,
};

fn adaptive_config() -> AdaptiveConfig {
    AdaptiveConfig {
        enabled: true,
        min_feedback: 3,
        recalc_every_queries: 1,
        ..Default::default()
    }
}

/// Selected result is strong on pattern match, the other on text relevance.
fn pattern_preferring(intent: Intent) -> InteractionRecord {
    feedback(
        intent,
        vec![
            ("picked", [0.2, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1.0]),
            ("skipped", [1.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0]),
        ],
        &["picked"],
        InteractionOutcome::Accepted,
    )
}

#[tokio::test(start_paused = true)]
async fn pipeline_feedback_reaches_the_store_and_shifts_weights() {
    let store = Arc::new(RecordingFeedbackStore::new());
    let config = SiftConfig {
        adaptive: adaptive_config(),
        ..Default::default()
    };
    let pipeline = SearchPipeline::builder(config)
        .search_index(Arc::new(InMemorySearchIndex::new(corpus())))
        .vector_search(Arc::new(InMemoryVectorSearch::new(vector_hits())))
        .feedback_store(store.clone())
        .retry_policy(RetryPolicy::once())
        .build()
        .unwrap();

    for _ in 0..3 {
        assert!(pipeline.record_feedback(pattern_preferring(Intent::Implement)));
    }
    for _ in 0..100 {
        if store.len() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(store.len(), 3);

    let out = pipeline
        .search(Query::new("implement caching with retry logic"), CodeContext::default())
        .await;
    assert!(out.success && out.metadata.ranked);
}

#[tokio::test(start_paused = true)]
async fn recalculation_moves_weights_toward_selected_factors() {
    let base = Arc::new(ContextualRanker::new(
        RankingConfig::default(),
        Arc::new(PatternRegistry::new()),
    ));
    let before = base.weights_for(Intent::Implement);
    let ranker = AdaptiveRanker::spawn(base, &adaptive_config(), None).unwrap();

    for _ in 0..3 {
        assert!(ranker.record_feedback(pattern_preferring(Intent::Implement)));
    }
    assert!(ranker.request_recalculation());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let after = ranker.weights_for(Intent::Implement);
    assert!(ranker.snapshot().version() > 0);
    assert!(after.get(Factor::PatternMatch) > before.get(Factor::PatternMatch));
    assert!(after.get(Factor::TextRelevance) < before.get(Factor::TextRelevance));
    assert!((after.sum() - 1.0).abs() < 1e-6);

    let untouched = ranker.weights_for(Intent::Debug);
    assert_eq!(untouched, ContextualRanker::new(
        RankingConfig::default(),
        Arc::new(PatternRegistry::new()),
    )
    .weights_for(Intent::Debug));
}

#[tokio::test]
async fn spawning_outside_a_runtime_fails_cleanly() {
    let base = Arc::new(ContextualRanker::new(
        RankingConfig::default(),
        Arc::new(PatternRegistry::new()),
    ));
    let result = std::thread::spawn(move || {
        AdaptiveRanker::spawn(base, &adaptive_config(), None).is_err()
    })
    .join()
    .unwrap();
    assert!(result);
}

fn base_ranker() -> Arc<ContextualRanker> {
    Arc::new(ContextualRanker::new(
        RankingConfig::default(),
        Arc::new(PatternRegistry::new()),
    ))
}

#[tokio::test(start_paused = true)]
async fn stored_history_is_learned_after_restart() {
    let history = (0..3).map(|_| pattern_preferring(Intent::Implement)).collect();
    let store: Arc<dyn IFeedbackStore> = Arc::new(RecordingFeedbackStore::with_records(history));
    let before = base_ranker().weights_for(Intent::Implement);
    let ranker = AdaptiveRanker::spawn(base_ranker(), &adaptive_config(), Some(store)).unwrap();

    assert!(ranker.request_recalculation());
    for _ in 0..100 {
        if ranker.snapshot().version() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let after = ranker.weights_for(Intent::Implement);
    assert!(after.get(Factor::PatternMatch) > before.get(Factor::PatternMatch));
}

struct ThreadRecordingStore {
    threads: Mutex<Vec<ThreadId>>,
}

impl IFeedbackStore for ThreadRecordingStore {
    fn record(&self, _record: &InteractionRecord) -> SiftResult<()> {
        self.threads.lock().unwrap().push(thread::current().id());
        Ok(())
    }

    fn recent(&self, _intent: Intent, _limit: usize) -> SiftResult<Vec<InteractionRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn store_writes_run_off_the_runtime_thread() {
    let store = Arc::new(ThreadRecordingStore {
        threads: Mutex::new(Vec::new()),
    });
    let sink: Arc<dyn IFeedbackStore> = store.clone();
    let ranker = AdaptiveRanker::spawn(base_ranker(), &adaptive_config(), Some(sink)).unwrap();

    assert!(ranker.record_feedback(pattern_preferring(Intent::Test)));
    for _ in 0..100 {
        if !store.threads.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let threads = store.threads.lock().unwrap();
    assert_eq!(threads.len(), 1);
    assert_ne!(threads[0], thread::current().id());
}
