//! Concurrent stage execution with per-stage isolation.
//!
//! Every selected stage runs as its own task. A stage that times out, exhausts
//! its retries, panics, or finds its breaker open contributes an empty list;
//! siblings are never cancelled.
//!
//! [`StageExecutor::call`] applies the same timeout, retry and breaker to a
//! single direct call, for paths that bypass stage selection.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sift_core::config::ResilienceConfig;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::StageKind;
use sift_observability::stage_span;
use sift_observability::tracing_setup::events;
use tracing::{debug, Instrument};

use super::SearchStage;
use crate::resilience::{retry_with_backoff, CircuitBreaker, Deadline, RetryPolicy};

/// Outputs of one concurrent run, in the order the stages were requested.
#[derive(Debug, Clone)]
pub struct StageRun {
    /// One entry per requested stage; failed stages hold an empty output.
    pub outputs: Vec<StageOutput>,
    pub succeeded: Vec<StageKind>,
    pub failed: Vec<StageKind>,
}

impl StageRun {
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

pub struct StageExecutor {
    stages: HashMap<StageKind, Arc<dyn SearchStage>>,
    breakers: HashMap<StageKind, Arc<CircuitBreaker>>,
    config: ResilienceConfig,
    policy: RetryPolicy,
}

impl StageExecutor {
    pub fn new(config: &ResilienceConfig) -> Self {
        Self {
            stages: HashMap::new(),
            breakers: HashMap::new(),
            config: config.clone(),
            policy: RetryPolicy::from_config(config),
        }
    }

    /// Override the retry policy (tests use deterministic backoff).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a stage, replacing any earlier stage of the same kind. Each
    /// kind gets its own breaker.
    pub fn with_stage(mut self, stage: Arc<dyn SearchStage>) -> Self {
        let kind = stage.kind();
        self.breakers.insert(
            kind,
            Arc::new(CircuitBreaker::from_config(kind.as_str(), &self.config)),
        );
        self.stages.insert(kind, stage);
        self
    }

    pub fn has_stage(&self, kind: StageKind) -> bool {
        self.stages.contains_key(&kind)
    }

    pub fn breaker(&self, kind: StageKind) -> Option<&CircuitBreaker> {
        self.breakers.get(&kind).map(Arc::as_ref)
    }

    pub fn stage_timeout(&self) -> Duration {
        self.config.stage_timeout()
    }

    /// Run `kinds` concurrently. Unregistered kinds count as failed.
    pub async fn run(
        &self,
        kinds: &[StageKind],
        query: Arc<Query>,
        context: Arc<CodeContext>,
        deadline: Option<Deadline>,
    ) -> StageRun {
        let mut handles = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let handle = match (self.stages.get(&kind), self.breakers.get(&kind)) {
                (Some(stage), Some(breaker)) => {
                    let stage = Arc::clone(stage);
                    let breaker = Arc::clone(breaker);
                    let policy = self.policy;
                    let deadline = Deadline::after(self.stage_timeout()).min(deadline);
                    let query = Arc::clone(&query);
                    let context = Arc::clone(&context);
                    let task = async move {
                        guarded(Some(breaker.as_ref()), &policy, deadline, |_| {
                            stage.execute(&query, &context)
                        })
                        .await
                    };
                    let span = stage_span!(kind);
                    Some(tokio::spawn(task.instrument(span)))
                }
                _ => None,
            };
            handles.push((kind, handle));
        }

        let mut run = StageRun {
            outputs: Vec::with_capacity(kinds.len()),
            succeeded: Vec::new(),
            failed: Vec::new(),
        };
        for (kind, handle) in handles {
            let result = match handle {
                Some(handle) => handle.await.unwrap_or_else(|join_err| {
                    Err(SearchError::Unavailable {
                        reason: format!("stage task aborted: {join_err}"),
                    })
                }),
                None => Err(SearchError::Unavailable {
                    reason: "stage not registered".to_string(),
                }),
            };
            match result {
                Ok(mut output) => {
                    output.stage = kind;
                    debug!(stage = %kind, candidates = output.len(), "stage completed");
                    run.outputs.push(output);
                    run.succeeded.push(kind);
                }
                Err(err) => {
                    events::stage_failed(kind.as_str(), &err.to_string());
                    run.outputs.push(StageOutput::empty(kind));
                    run.failed.push(kind);
                }
            }
        }
        run
    }

    /// Run one call under `kind`'s timeout, retry policy and breaker. A
    /// failure is logged as a failure of that stage.
    pub async fn call<T, F, Fut>(
        &self,
        kind: StageKind,
        deadline: Option<Deadline>,
        op: F,
    ) -> Result<T, SearchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, SearchError>>,
    {
        let deadline = Deadline::after(self.stage_timeout()).min(deadline);
        let breaker = self.breakers.get(&kind).map(Arc::as_ref);
        let result = guarded(breaker, &self.policy, deadline, op)
            .instrument(stage_span!(kind))
            .await;
        if let Err(err) = &result {
            events::stage_failed(kind.as_str(), &err.to_string());
        }
        result
    }
}

async fn guarded<T, F, Fut>(
    breaker: Option<&CircuitBreaker>,
    policy: &RetryPolicy,
    deadline: Deadline,
    op: F,
) -> Result<T, SearchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let Some(breaker) = breaker else {
        return retry_with_backoff(policy, deadline, op).await;
    };
    if !breaker.is_allowed() {
        return Err(SearchError::CircuitOpen {
            component: breaker.component().to_string(),
        });
    }

    let result = retry_with_backoff(policy, deadline, op).await;
    match &result {
        Ok(_) => breaker.record_success(),
        Err(err) if err.trips_breaker() => breaker.record_failure(),
        Err(_) => breaker.release_trial(),
    }
    result
}
