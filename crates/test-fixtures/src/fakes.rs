use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sift_core::errors::{SearchError, SiftError, SiftResult};
use sift_core::models::{
    FileAnalysis, FusedResult, InteractionRecord, Query, SearchDocument, VectorHit,
};
use sift_core::traits::{
    ICodeAnalyzer, IFallbackSearcher, IFeedbackStore, ISearchIndex, IVectorSearch, QueryType,
    SearchRequest,
};
use sift_core::Intent;

const MIN_TERM_LEN: usize = 3;

fn unavailable(status: u16) -> SearchError {
    SearchError::Http {
        status,
        message: "injected failure".to_string(),
    }
}

/// Term-matching index over a fixed document set. Filters are recorded but not
/// evaluated. Documents with a preset `search_score` keep it.
#[derive(Default)]
pub struct InMemorySearchIndex {
    documents: Vec<SearchDocument>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl InMemorySearchIndex {
    pub fn new(documents: Vec<SearchDocument>) -> Self {
        Self {
            documents,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn search_sync(&self, request: &SearchRequest) -> Vec<SearchDocument> {
        self.requests.lock().unwrap().push(request.clone());
        let terms: Vec<String> = request
            .text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| t.len() >= MIN_TERM_LEN)
            .map(str::to_lowercase)
            .collect();

        let mut hits: Vec<(usize, SearchDocument)> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let haystack = format!(
                    "{} {} {}",
                    doc.content,
                    doc.function_name.as_deref().unwrap_or_default(),
                    doc.class_name.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                let matched: HashSet<&String> =
                    terms.iter().filter(|t| haystack.contains(t.as_str())).collect();
                (!matched.is_empty()).then(|| (matched.len(), doc.clone()))
            })
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        hits.into_iter()
            .take(request.top)
            .map(|(matched, mut doc)| {
                doc.search_score.get_or_insert(matched as f64);
                if request.query_type == QueryType::Semantic {
                    doc.reranker_score.get_or_insert((matched as f64).min(4.0));
                }
                doc
            })
            .collect()
    }
}

#[async_trait]
impl ISearchIndex for InMemorySearchIndex {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
        Ok(self.search_sync(request))
    }

    async fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError> {
        Ok(self.documents.iter().find(|d| d.id == id).cloned())
    }
}

/// Fails every call with the given HTTP status.
pub struct FailingSearchIndex {
    status: u16,
    calls: AtomicUsize,
}

impl FailingSearchIndex {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            calls: AtomicUsize::new(0),
        }
    }

    /// A 503, which is retryable and trips breakers.
    pub fn unavailable() -> Self {
        Self::new(503)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ISearchIndex for FailingSearchIndex {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(unavailable(self.status))
    }

    async fn get_document(&self, _id: &str) -> Result<Option<SearchDocument>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(unavailable(self.status))
    }
}

/// Fails the first `failures` searches with a 503, then delegates.
pub struct FlakySearchIndex {
    inner: Arc<dyn ISearchIndex>,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakySearchIndex {
    pub fn new(inner: Arc<dyn ISearchIndex>, failures: usize) -> Self {
        Self {
            inner,
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ISearchIndex for FlakySearchIndex {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(unavailable(503));
        }
        self.inner.search(request).await
    }

    async fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError> {
        self.inner.get_document(id).await
    }
}

/// Sleeps before every search. Pair with paused Tokio time.
pub struct SlowSearchIndex {
    inner: Arc<dyn ISearchIndex>,
    delay: Duration,
}

impl SlowSearchIndex {
    pub fn new(inner: Arc<dyn ISearchIndex>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl ISearchIndex for SlowSearchIndex {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
        tokio::time::sleep(self.delay).await;
        self.inner.search(request).await
    }

    async fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError> {
        self.inner.get_document(id).await
    }
}

/// Returns its fixed hits, best first, regardless of the query text.
#[derive(Default)]
pub struct InMemoryVectorSearch {
    hits: Vec<VectorHit>,
}

impl InMemoryVectorSearch {
    pub fn new(mut hits: Vec<VectorHit>) -> Self {
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        Self { hits }
    }
}

#[async_trait]
impl IVectorSearch for InMemoryVectorSearch {
    async fn vector_search(
        &self,
        _text: &str,
        _filter: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<VectorHit>, SearchError> {
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

pub struct FailingVectorSearch {
    status: u16,
}

impl FailingVectorSearch {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

#[async_trait]
impl IVectorSearch for FailingVectorSearch {
    async fn vector_search(
        &self,
        _text: &str,
        _filter: Option<&str>,
        _top_k: usize,
    ) -> Result<Vec<VectorHit>, SearchError> {
        Err(unavailable(self.status))
    }
}

/// Keeps every record in memory.
#[derive(Default)]
pub struct RecordingFeedbackStore {
    records: Mutex<Vec<InteractionRecord>>,
}

impl RecordingFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `records`, oldest first.
    pub fn with_records(records: Vec<InteractionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IFeedbackStore for RecordingFeedbackStore {
    fn record(&self, record: &InteractionRecord) -> SiftResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn recent(&self, intent: Intent, limit: usize) -> SiftResult<Vec<InteractionRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.intent == intent)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Returns the same analysis for every file.
pub struct StubAnalyzer {
    analysis: FileAnalysis,
}

impl StubAnalyzer {
    pub fn new(analysis: FileAnalysis) -> Self {
        Self { analysis }
    }
}

impl ICodeAnalyzer for StubAnalyzer {
    fn analyze(&self, _file_path: &str) -> SiftResult<FileAnalysis> {
        Ok(self.analysis.clone())
    }
}

pub struct FailingAnalyzer;

impl ICodeAnalyzer for FailingAnalyzer {
    fn analyze(&self, file_path: &str) -> SiftResult<FileAnalysis> {
        Err(SiftError::AnalysisFailed {
            path: file_path.to_string(),
            reason: "parser unavailable".to_string(),
        })
    }
}

/// Fallback searcher with a canned answer.
pub struct StaticFallback {
    answer: Result<Vec<FusedResult>, SearchError>,
    calls: AtomicUsize,
}

impl StaticFallback {
    pub fn new(results: Vec<FusedResult>) -> Self {
        Self {
            answer: Ok(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(unavailable(500)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IFallbackSearcher for StaticFallback {
    async fn search(&self, _query: &Query) -> Result<Vec<FusedResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}
