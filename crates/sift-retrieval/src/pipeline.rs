//! SearchPipeline: the per-query state machine.
//!
//! ```text
//! ExtractContext → ClassifyIntent → EnhanceQuery → Retrieve
//!   → AugmentMetadata → Rank → LimitAndExplain → (RecordFeedback)
//! ```
//!
//! Every step degrades instead of failing. The result always comes back as a
//! [`PipelineResult`]; `success` is false only when every stage failed and no
//! fallback answered.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use sift_core::config::SiftConfig;
use sift_core::errors::{RetrievalError, SiftError, SiftResult};
use sift_core::models::{
    CodeContext, FusedResult, InteractionRecord, PipelineMetadata, PipelineResult, Query,
    SearchMode, StageTiming,
};
use sift_core::traits::{
    ICodeAnalyzer, IFallbackSearcher, IFeedbackStore, IPatternRecognizer, ISearchIndex,
    ITokenizer, IVectorSearch,
};
use sift_core::{Intent, StageKind};
use sift_observability::tracing_setup::events;
use sift_observability::{pipeline_span, MetricsCollector};
use tracing::{debug, warn, Instrument};

use crate::adaptive::AdaptiveRanker;
use crate::budget::ContextAssembler;
use crate::engine::{RetrievalEngine, RetrievalOutcome};
use crate::expansion::QueryEnhancer;
use crate::fusion::FusionEngine;
use crate::intent::IntentEngine;
use crate::patterns::PatternRegistry;
use crate::ranking::{ContextualRanker, Ranker};
use crate::resilience::RetryPolicy;
use crate::search::{
    DependencyStage, KeywordStage, PatternStage, SemanticStage, StageExecutor, StageSettings,
    VectorStage,
};

pub struct SearchPipeline {
    config: SiftConfig,
    intents: IntentEngine,
    enhancer: QueryEnhancer,
    engine: RetrievalEngine,
    ranker: Arc<dyn Ranker>,
    analyzer: Option<Arc<dyn ICodeAnalyzer>>,
    metrics: Mutex<MetricsCollector>,
}

impl SearchPipeline {
    pub fn new(config: SiftConfig, engine: RetrievalEngine, ranker: Arc<dyn Ranker>) -> Self {
        let metrics = MetricsCollector::with_monitor_window(config.observability.monitor_window);
        Self {
            enhancer: QueryEnhancer::from_config(&config.retrieval),
            intents: IntentEngine::new(),
            engine,
            ranker,
            analyzer: None,
            metrics: Mutex::new(metrics),
            config,
        }
    }

    pub fn builder(config: SiftConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn ICodeAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn engine(&self) -> &RetrievalEngine {
        &self.engine
    }

    /// Snapshot of the collected metrics.
    pub fn metrics(&self) -> MetricsCollector {
        self.lock_metrics().clone()
    }

    fn lock_metrics(&self) -> MutexGuard<'_, MetricsCollector> {
        self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Forward an interaction to the ranker for learning. Never blocks.
    pub fn record_feedback(&self, record: InteractionRecord) -> bool {
        self.ranker.record_feedback(record)
    }

    pub async fn search(&self, query: Query, context: CodeContext) -> PipelineResult {
        let span = pipeline_span!(query.text);
        self.run(query, context).instrument(span).await
    }

    async fn run(&self, query: Query, mut context: CodeContext) -> PipelineResult {
        let started = Instant::now();
        let mut timer = StepTimer::new();
        let mut metadata = PipelineMetadata::default();

        self.extract_context(&query, &mut context).await;
        timer.lap("extract_context");

        let intent = self.intents.classify(&query);
        timer.lap("classify_intent");

        let enhanced = self.enhancer.enhance(&query, &context, intent);
        let query = query.enhanced(intent, enhanced.queries, enhanced.exclude_terms);
        metadata.intent = Some(intent);
        metadata.enhanced_queries = query.queries.clone();
        metadata.exclude_terms = query.exclude_terms.clone();
        timer.lap("enhance_query");

        if query.mode == SearchMode::KeywordOnly {
            return self
                .keyword_only(&query, intent, metadata, timer, started)
                .await;
        }

        let stages = self.select_stages(intent, &context);
        let outcome = self.engine.retrieve(&query, &context, &stages).await;
        timer.lap("retrieve");
        {
            let mut metrics = self.lock_metrics();
            for stage in &outcome.stages_failed {
                metrics.retrieval.record_stage_failure(*stage);
            }
            if outcome.used_fallback {
                metrics.retrieval.record_fallback();
            }
        }

        let total_failure = outcome.total_failure();
        let RetrievalOutcome {
            mut results,
            context: assembled,
            stages_run,
            stages_failed,
            used_fallback,
            fallback_error,
        } = outcome;
        metadata.candidates_fused = results.len();

        augment_metadata(&mut results);
        timer.lap("augment_metadata");

        let (mut results, ranked) = self.rank(&query, results, &context, intent);
        timer.lap("rank");

        results.truncate(query.top_k);
        for result in &mut results {
            if result.explanation.is_none() {
                result.explanation = Some(format!("Fused score: {:.2}", result.fused_score));
            }
        }
        timer.lap("limit_and_explain");

        let error = total_failure.then(|| {
            let base = RetrievalError::AllStagesFailed {
                attempted: stages_run.len(),
            }
            .to_string();
            match fallback_error {
                Some(reason) => format!("{base}; {}", RetrievalError::FallbackFailed { reason }),
                None => base,
            }
        });

        metadata.stages_run = stages_run;
        metadata.stages_failed = stages_failed;
        metadata.used_fallback = used_fallback;
        metadata.ranked = ranked;

        let result = PipelineResult {
            success: !total_failure,
            results,
            context: assembled,
            error,
            metadata,
        };
        self.finish(result, intent, ranked, timer, started)
    }

    async fn keyword_only(
        &self,
        query: &Query,
        intent: Intent,
        mut metadata: PipelineMetadata,
        mut timer: StepTimer,
        started: Instant,
    ) -> PipelineResult {
        metadata.stages_run = vec![StageKind::Keyword];
        let (results, error) = match self.engine.keyword_only(query, query.top_k).await {
            Ok(results) => (results, None),
            Err(err) => {
                self.lock_metrics()
                    .retrieval
                    .record_stage_failure(StageKind::Keyword);
                metadata.stages_failed = vec![StageKind::Keyword];
                (Vec::new(), Some(err.to_string()))
            }
        };
        timer.lap("keyword_only");
        metadata.candidates_fused = results.len();
        let result = PipelineResult {
            success: error.is_none(),
            results,
            context: Default::default(),
            error,
            metadata,
        };
        self.finish(result, intent, false, timer, started)
    }

    fn finish(
        &self,
        mut result: PipelineResult,
        intent: Intent,
        ranked: bool,
        timer: StepTimer,
        started: Instant,
    ) -> PipelineResult {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        result.metadata.results_returned = result.results.len();
        result.metadata.timings = timer.finish();
        result.metadata.total_ms = elapsed_ms;

        {
            let mut metrics = self.lock_metrics();
            metrics.retrieval.record_query(
                Some(intent),
                !result.results.is_empty(),
                elapsed_ms,
                result.context.total_tokens as u64,
                self.config.fusion.effective_context_budget() as u64,
            );
            if ranked {
                let scores: Vec<f64> = result.results.iter().map(|r| r.score).collect();
                let dominant = result.results.first().and_then(|top| top.dominant_factor);
                metrics.ranking.record(intent, &scores, dominant);
            }
        }

        events::pipeline_completed(
            intent.as_str(),
            result.results.len(),
            elapsed_ms,
            result.success,
        );
        result
    }

    /// Fill the ambient context from the query and, when available, the
    /// analyzer. The analyzer is synchronous and runs on the blocking pool.
    async fn extract_context(&self, query: &Query, context: &mut CodeContext) {
        fill(&mut context.current_file, &query.current_file);
        fill(&mut context.language, &query.language);
        fill(&mut context.framework, &query.framework);
        fill(&mut context.repository, &query.repository);

        let (Some(analyzer), Some(file)) = (&self.analyzer, context.current_file.clone()) else {
            return;
        };
        let analyzer = Arc::clone(analyzer);
        let path = file.clone();
        match tokio::task::spawn_blocking(move || analyzer.analyze(&path)).await {
            Ok(Ok(analysis)) => context.absorb_analysis(analysis),
            Ok(Err(err)) => warn!(file = %file, error = %err, "context analysis failed, continuing"),
            Err(err) => warn!(file = %file, error = %err, "context analysis aborted, continuing"),
        }
    }

    /// Static intent table, plus the dependency stage when there are imports to chase.
    fn select_stages(&self, intent: Intent, context: &CodeContext) -> Vec<StageKind> {
        let mut stages = self.intents.stages(intent).to_vec();
        if !context.imports.is_empty()
            && self.engine.executor().has_stage(StageKind::Dependency)
            && !stages.contains(&StageKind::Dependency)
        {
            stages.push(StageKind::Dependency);
        }
        stages
    }

    fn rank(
        &self,
        query: &Query,
        results: Vec<FusedResult>,
        context: &CodeContext,
        intent: Intent,
    ) -> (Vec<FusedResult>, bool) {
        if results.is_empty() {
            return (results, false);
        }
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.ranker.rank(query, results.clone(), context, intent)
        }));
        let reason = match attempt {
            Ok(Ok(ranked)) => return (ranked, true),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => format!("ranker panicked: {}", panic_message(payload.as_ref())),
        };
        events::ranking_fallback(intent.as_str(), &reason);
        self.lock_metrics().retrieval.record_ranking_fallback();
        (results, false)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

fn fill(slot: &mut Option<String>, source: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(source);
    }
}

/// Give results a language inferred from their file extension when missing.
pub fn augment_metadata(results: &mut [FusedResult]) {
    for result in results.iter_mut().filter(|r| r.language.is_none()) {
        result.language = result
            .file_path
            .as_deref()
            .and_then(language_from_path)
            .map(str::to_string);
    }
}

pub fn language_from_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "py" | "pyi" => "python",
        "rs" => "rust",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "cs" => "csharp",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "c" | "h" => "c",
        "php" => "php",
        "swift" => "swift",
        "scala" => "scala",
        _ => return None,
    };
    Some(language)
}

/// Wall-clock timings per step.
struct StepTimer {
    last: Instant,
    timings: Vec<StageTiming>,
}

impl StepTimer {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            timings: Vec::new(),
        }
    }

    fn lap(&mut self, step: &str) {
        let now = Instant::now();
        self.timings.push(StageTiming {
            step: step.to_string(),
            elapsed_ms: now.duration_since(self.last).as_millis() as u64,
        });
        self.last = now;
    }

    fn finish(self) -> Vec<StageTiming> {
        self.timings
    }
}

/// Assembles a pipeline from collaborators. Stages are registered for the
/// collaborators supplied: an index enables keyword, semantic, pattern and
/// dependency search plus hydration; a vector client enables vector search.
pub struct PipelineBuilder {
    config: SiftConfig,
    index: Option<Arc<dyn ISearchIndex>>,
    vector: Option<Arc<dyn IVectorSearch>>,
    patterns: Option<Arc<dyn IPatternRecognizer>>,
    analyzer: Option<Arc<dyn ICodeAnalyzer>>,
    fallback: Option<Arc<dyn IFallbackSearcher>>,
    feedback_store: Option<Arc<dyn IFeedbackStore>>,
    tokenizer: Option<Arc<dyn ITokenizer>>,
    retry_policy: Option<RetryPolicy>,
}

impl PipelineBuilder {
    pub fn new(config: SiftConfig) -> Self {
        Self {
            config,
            index: None,
            vector: None,
            patterns: None,
            analyzer: None,
            fallback: None,
            feedback_store: None,
            tokenizer: None,
            retry_policy: None,
        }
    }

    pub fn search_index(mut self, index: Arc<dyn ISearchIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn vector_search(mut self, vector: Arc<dyn IVectorSearch>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn pattern_recognizer(mut self, patterns: Arc<dyn IPatternRecognizer>) -> Self {
        self.patterns = Some(patterns);
        self
    }

    pub fn code_analyzer(mut self, analyzer: Arc<dyn ICodeAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn fallback(mut self, fallback: Arc<dyn IFallbackSearcher>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn feedback_store(mut self, store: Arc<dyn IFeedbackStore>) -> Self {
        self.feedback_store = Some(store);
        self
    }

    pub fn tokenizer(mut self, tokenizer: Arc<dyn ITokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Validate the config and wire everything. With adaptive ranking
    /// enabled this must run inside a Tokio runtime.
    pub fn build(self) -> SiftResult<SearchPipeline> {
        self.config.validate()?;
        let config = self.config;
        let settings = StageSettings::from_config(&config.retrieval);
        let patterns: Arc<dyn IPatternRecognizer> = match self.patterns {
            Some(patterns) => patterns,
            None => Arc::new(PatternRegistry::new()),
        };

        let mut executor = StageExecutor::new(&config.resilience);
        if let Some(policy) = self.retry_policy {
            executor = executor.with_policy(policy);
        }
        if let Some(vector) = &self.vector {
            executor = executor.with_stage(Arc::new(VectorStage::new(
                Arc::clone(vector),
                settings.clone(),
            )));
        }

        let mut keyword_fast_path = None;
        let fusion = match &self.index {
            Some(index) => {
                let keyword = Arc::new(KeywordStage::new(Arc::clone(index), settings.clone()));
                keyword_fast_path = Some(Arc::clone(&keyword));
                executor = executor
                    .with_stage(keyword)
                    .with_stage(Arc::new(SemanticStage::new(
                        Arc::clone(index),
                        settings.clone(),
                    )))
                    .with_stage(Arc::new(PatternStage::new(
                        Arc::clone(index),
                        Arc::clone(&patterns),
                        settings.clone(),
                    )))
                    .with_stage(Arc::new(DependencyStage::new(
                        Arc::clone(index),
                        settings.clone(),
                    )));
                FusionEngine::with_documents(config.fusion.clone(), Arc::clone(index), &config.cache)
            }
            None => FusionEngine::new(config.fusion.clone()),
        };

        let mut assembler = ContextAssembler::from_config(&config.fusion);
        if let Some(tokenizer) = self.tokenizer {
            assembler = assembler.with_tokenizer(tokenizer);
        }
        let mut engine = RetrievalEngine::new(executor, fusion).with_assembler(assembler);
        if let Some(keyword) = keyword_fast_path {
            engine = engine.with_keyword_fast_path(keyword);
        }
        if let Some(fallback) = self.fallback {
            engine = engine.with_fallback(fallback);
        }

        let contextual = ContextualRanker::new(config.ranking.clone(), patterns);
        let ranker: Arc<dyn Ranker> = if config.adaptive.enabled {
            Arc::new(
                AdaptiveRanker::spawn(Arc::new(contextual), &config.adaptive, self.feedback_store)
                    .map_err(SiftError::from)?,
            )
        } else {
            Arc::new(contextual)
        };
        debug!(adaptive = config.adaptive.enabled, "pipeline built");

        let mut pipeline = SearchPipeline::new(config, engine, ranker);
        if let Some(analyzer) = self.analyzer {
            pipeline = pipeline.with_analyzer(analyzer);
        }
        Ok(pipeline)
    }
}
