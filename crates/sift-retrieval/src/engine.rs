//! RetrievalEngine: run the selected stages, fuse, hydrate and assemble
//! context, falling back to a secondary searcher when every stage fails.

use std::sync::Arc;

use serde::Serialize;
use sift_core::errors::SearchError;
use sift_core::models::{AssembledContext, CodeContext, FusedResult, Query, SearchDocument};
use sift_core::traits::IFallbackSearcher;
use sift_core::StageKind;
use sift_observability::tracing_setup::events;
use tracing::{debug, info};

use crate::budget::ContextAssembler;
use crate::fusion::FusionEngine;
use crate::resilience::Deadline;
use crate::search::{KeywordStage, StageExecutor};

/// Everything `retrieve` learned about one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievalOutcome {
    pub results: Vec<FusedResult>,
    pub context: AssembledContext,
    pub stages_run: Vec<StageKind>,
    pub stages_failed: Vec<StageKind>,
    pub used_fallback: bool,
    pub fallback_error: Option<String>,
}

impl RetrievalOutcome {
    /// Every attempted stage failed and no fallback answered.
    pub fn total_failure(&self) -> bool {
        !self.stages_run.is_empty()
            && self.stages_failed.len() == self.stages_run.len()
            && !self.used_fallback
    }
}

pub struct RetrievalEngine {
    executor: StageExecutor,
    fusion: FusionEngine,
    assembler: ContextAssembler,
    keyword: Option<Arc<KeywordStage>>,
    fallback: Option<Arc<dyn IFallbackSearcher>>,
}

impl RetrievalEngine {
    pub fn new(executor: StageExecutor, fusion: FusionEngine) -> Self {
        let assembler = ContextAssembler::from_config(fusion.config());
        Self {
            executor,
            fusion,
            assembler,
            keyword: None,
            fallback: None,
        }
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Keyword stage used by the keyword-only fast path.
    pub fn with_keyword_fast_path(mut self, keyword: Arc<KeywordStage>) -> Self {
        self.keyword = Some(keyword);
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn IFallbackSearcher>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn executor(&self) -> &StageExecutor {
        &self.executor
    }

    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    /// Run `stages` concurrently and fuse what succeeded. Never fails: a
    /// failed stage contributes nothing, and if all fail the fallback (or an
    /// empty outcome) is returned.
    pub async fn retrieve(
        &self,
        query: &Query,
        context: &CodeContext,
        stages: &[StageKind],
    ) -> RetrievalOutcome {
        let deadline = query.deadline().map(Deadline::after);
        let run = self
            .executor
            .run(
                stages,
                Arc::new(query.clone()),
                Arc::new(context.clone()),
                deadline,
            )
            .await;

        let mut outcome = RetrievalOutcome {
            stages_run: stages.to_vec(),
            stages_failed: run.failed.clone(),
            ..Default::default()
        };

        if run.all_failed() {
            self.apply_fallback(query, &mut outcome).await;
        } else {
            outcome.results = self.fusion.fuse(run.outputs).await;
        }

        outcome.context = self.assembler.assemble(&outcome.results);
        info!(
            stages = stages.len(),
            failed = outcome.stages_failed.len(),
            results = outcome.results.len(),
            fallback = outcome.used_fallback,
            "retrieval complete"
        );
        outcome
    }

    async fn apply_fallback(&self, query: &Query, outcome: &mut RetrievalOutcome) {
        let Some(fallback) = &self.fallback else {
            events::fallback_used("all stages failed, no fallback configured", 0);
            return;
        };
        match fallback.search(query).await {
            Ok(mut results) => {
                results.retain(|r| !r.is_blank());
                results.truncate(self.fusion.config().top_k);
                events::fallback_used("all stages failed", results.len());
                outcome.results = results;
                outcome.used_fallback = true;
            }
            Err(err) => {
                events::fallback_used(&format!("fallback failed: {err}"), 0);
                outcome.fallback_error = Some(err.to_string());
            }
        }
    }

    /// Top-K keyword hits with the engine's BM25 score left unmodified. The
    /// index call runs under the keyword stage's timeout, retry and breaker.
    pub async fn keyword_only(
        &self,
        query: &Query,
        top_k: usize,
    ) -> Result<Vec<FusedResult>, SearchError> {
        let keyword = self.keyword.as_ref().ok_or_else(|| SearchError::Unavailable {
            reason: "keyword fast path not configured".to_string(),
        })?;
        let deadline = query.deadline().map(Deadline::after);
        let docs = self
            .executor
            .call(StageKind::Keyword, deadline, |_| keyword.top_hits(query, top_k))
            .await?;
        let results: Vec<FusedResult> = docs
            .into_iter()
            .filter(|d| !d.content.trim().is_empty())
            .map(keyword_result)
            .collect();
        debug!(results = results.len(), "keyword-only search");
        Ok(results)
    }
}

fn keyword_result(doc: SearchDocument) -> FusedResult {
    let score = doc.search_score.unwrap_or(0.0);
    FusedResult {
        id: doc.id,
        score,
        fused_score: score,
        original_score: score,
        bm25_score: doc.search_score,
        code_snippet: doc.content,
        file_path: doc.file_path,
        repository: doc.repository,
        language: doc.language,
        function_name: doc.function_name,
        class_name: doc.class_name,
        start_line: doc.start_line,
        end_line: doc.end_line,
        highlights: doc.highlights,
        imports: doc.imports,
        reranker_score: doc.reranker_score,
        cross_encoder_score: doc.cross_encoder_score,
        last_modified: doc.last_modified,
        quality: doc.quality,
        test_coverage: doc.test_coverage,
        complexity: doc.complexity,
        documentation: doc.documentation,
        tags: doc.tags,
        ..Default::default()
    }
}
