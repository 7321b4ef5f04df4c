//! Stage isolation under timeouts, retries and open breakers.

use std::sync::Arc;
use std::time::Duration;

use sift_core::config::{FusionConfig, ResilienceConfig};
use sift_core::models::{CodeContext, Query};
use sift_core::traits::ISearchIndex;
use sift_core::StageKind;
use sift_retrieval::resilience::{Backoff, CircuitState, RetryPolicy};
use sift_retrieval::search::{KeywordStage, StageSettings, VectorStage};
use sift_retrieval::{FusionEngine, RetrievalEngine, StageExecutor};
use test_fixtures::{
    corpus, vector_hits, FailingSearchIndex, FlakySearchIndex, InMemorySearchIndex,
    InMemoryVectorSearch, SlowSearchIndex,
};

fn engine_with(index: Arc<dyn ISearchIndex>, policy: RetryPolicy) -> RetrievalEngine {
    let settings = StageSettings::default();
    let executor = StageExecutor::new(&ResilienceConfig::default())
        .with_policy(policy)
        .with_stage(Arc::new(KeywordStage::new(index, settings.clone())))
        .with_stage(Arc::new(VectorStage::new(
            Arc::new(InMemoryVectorSearch::new(vector_hits())),
            settings,
        )));
    RetrievalEngine::new(executor, FusionEngine::new(FusionConfig::default()))
}

const STAGES: &[StageKind] = &[StageKind::Vector, StageKind::Keyword];

#[tokio::test(start_paused = true)]
async fn slow_stage_times_out_without_blocking_siblings() {
    let slow = Arc::new(SlowSearchIndex::new(
        Arc::new(InMemorySearchIndex::new(corpus())),
        Duration::from_secs(30),
    ));
    let engine = engine_with(slow, RetryPolicy::once());

    let query = Query::new("retry caching").with_deadline(Duration::from_millis(500));
    let outcome = engine.retrieve(&query, &CodeContext::default(), STAGES).await;

    assert_eq!(outcome.stages_failed, vec![StageKind::Keyword]);
    assert!(!outcome.total_failure());
    assert!(!outcome.results.is_empty());
    assert!(outcome.results.iter().all(|r| r.id.starts_with('v')));
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() {
    let flaky = Arc::new(FlakySearchIndex::new(
        Arc::new(InMemorySearchIndex::new(corpus())),
        2,
    ));
    let policy = RetryPolicy::new(
        3,
        Backoff::new(Duration::from_millis(10), Duration::from_millis(40)).without_jitter(),
    );
    let engine = engine_with(flaky.clone(), policy);

    let outcome = engine
        .retrieve(&Query::new("retry"), &CodeContext::default(), STAGES)
        .await;

    assert!(outcome.stages_failed.is_empty());
    assert_eq!(flaky.calls(), 3);
    assert!(outcome.results.iter().any(|r| r.id == "k1"));
}

#[tokio::test]
async fn non_retryable_failure_is_not_retried() {
    let failing = Arc::new(FailingSearchIndex::new(400));
    let policy = RetryPolicy::new(3, Backoff::new(Duration::ZERO, Duration::ZERO));
    let engine = engine_with(failing.clone(), policy);

    let outcome = engine
        .retrieve(&Query::new("retry"), &CodeContext::default(), &[StageKind::Keyword])
        .await;

    assert_eq!(outcome.stages_failed, vec![StageKind::Keyword]);
    assert!(outcome.total_failure());
    assert_eq!(failing.calls(), 1);
}

#[tokio::test]
async fn breaker_opens_after_consecutive_failures() {
    let failing = Arc::new(FailingSearchIndex::unavailable());
    let engine = engine_with(failing.clone(), RetryPolicy::once());
    let threshold = ResilienceConfig::default().failure_threshold as usize;
    let query = Query::new("retry");

    for _ in 0..threshold {
        engine
            .retrieve(&query, &CodeContext::default(), &[StageKind::Keyword])
            .await;
    }
    let breaker = engine.executor().breaker(StageKind::Keyword).unwrap();
    assert_eq!(breaker.state(), CircuitState::Open);
    assert_eq!(failing.calls(), threshold);

    let outcome = engine
        .retrieve(&query, &CodeContext::default(), &[StageKind::Keyword])
        .await;
    assert_eq!(outcome.stages_failed, vec![StageKind::Keyword]);
    assert_eq!(failing.calls(), threshold, "open breaker must short-circuit");

    let vector = engine.executor().breaker(StageKind::Vector).unwrap();
    assert_eq!(vector.state(), CircuitState::Closed);
}

#[tokio::test]
async fn unregistered_stage_counts_as_failed() {
    let engine = engine_with(
        Arc::new(InMemorySearchIndex::new(corpus())),
        RetryPolicy::once(),
    );
    let outcome = engine
        .retrieve(
            &Query::new("retry"),
            &CodeContext::default(),
            &[StageKind::Keyword, StageKind::Semantic],
        )
        .await;
    assert_eq!(outcome.stages_failed, vec![StageKind::Semantic]);
    assert!(!outcome.results.is_empty());
}
