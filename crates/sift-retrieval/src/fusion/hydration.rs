//! Hydration: turn fused ids into full results.
//!
//! Documents are fetched through a bounded, TTL-expiring cache shared across
//! calls. Fields missing from the document are backfilled from metadata the
//! stages captured. Per-stage scores come from metadata only and are never
//! overwritten once set.

use std::collections::HashMap;
use std::sync::Arc;

use moka::sync::Cache;
use sift_core::config::CacheConfig;
use sift_core::models::{Candidate, CandidateMetadata, FusedResult, SearchDocument};
use sift_core::traits::ISearchIndex;
use tracing::debug;

/// Bounded id → document cache.
#[derive(Clone)]
pub struct DocumentCache {
    inner: Cache<String, Arc<SearchDocument>>,
}

impl DocumentCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(config.ttl())
                .build(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<SearchDocument>> {
        self.inner.get(id)
    }

    pub fn insert(&self, document: SearchDocument) -> Arc<SearchDocument> {
        let document = Arc::new(document);
        self.inner.insert(document.id.clone(), Arc::clone(&document));
        document
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

/// Fetches full documents for fused candidates.
#[derive(Clone)]
pub struct Hydrator {
    index: Option<Arc<dyn ISearchIndex>>,
    cache: DocumentCache,
}

impl Hydrator {
    pub fn new(index: Option<Arc<dyn ISearchIndex>>, config: &CacheConfig) -> Self {
        Self {
            index,
            cache: DocumentCache::new(config),
        }
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    async fn fetch(&self, id: &str) -> Option<Arc<SearchDocument>> {
        if let Some(doc) = self.cache.get(id) {
            return Some(doc);
        }
        let index = self.index.as_ref()?;
        match index.get_document(id).await {
            Ok(Some(doc)) => Some(self.cache.insert(doc)),
            Ok(None) => None,
            Err(err) => {
                debug!(id, error = %err, "document fetch failed, using stage metadata");
                None
            }
        }
    }

    /// Hydrate in fused order, dropping anything whose content ends up blank.
    pub async fn hydrate(
        &self,
        fused: &[Candidate],
        metadata: &HashMap<String, CandidateMetadata>,
    ) -> Vec<FusedResult> {
        let mut results = Vec::with_capacity(fused.len());
        for candidate in fused {
            let document = self.fetch(&candidate.id).await;
            let result = build_result(candidate, document.as_deref(), metadata.get(&candidate.id));
            if result.is_blank() {
                debug!(id = %candidate.id, "dropping result with empty content");
                continue;
            }
            results.push(result);
        }
        results
    }
}

pub(crate) fn build_result(
    candidate: &Candidate,
    document: Option<&SearchDocument>,
    metadata: Option<&CandidateMetadata>,
) -> FusedResult {
    let mut result = match document {
        Some(doc) => from_document(doc),
        None => FusedResult {
            id: candidate.id.clone(),
            ..Default::default()
        },
    };
    result.score = candidate.score;
    result.fused_score = candidate.score;

    if let Some(meta) = metadata {
        backfill(&mut result, meta);
    }
    result.original_score = resolve_original_score(&result);
    result
}

fn from_document(doc: &SearchDocument) -> FusedResult {
    FusedResult {
        id: doc.id.clone(),
        code_snippet: doc.content.clone(),
        file_path: doc.file_path.clone(),
        repository: doc.repository.clone(),
        language: doc.language.clone(),
        function_name: doc.function_name.clone(),
        class_name: doc.class_name.clone(),
        start_line: doc.start_line,
        end_line: doc.end_line,
        highlights: doc.highlights.clone(),
        imports: doc.imports.clone(),
        reranker_score: doc.reranker_score,
        cross_encoder_score: doc.cross_encoder_score,
        last_modified: doc.last_modified,
        quality: doc.quality,
        test_coverage: doc.test_coverage,
        complexity: doc.complexity,
        documentation: doc.documentation.clone(),
        tags: doc.tags.clone(),
        ..Default::default()
    }
}

fn backfill(result: &mut FusedResult, meta: &CandidateMetadata) {
    if result.is_blank() {
        if let Some(content) = meta.content.as_ref() {
            result.code_snippet.clone_from(content);
        }
    }
    if result.highlights.is_empty() {
        result.highlights.clone_from(&meta.highlights);
    }
    if result.imports.is_empty() {
        result.imports.clone_from(&meta.imports);
    }
    fill(&mut result.file_path, &meta.file_path);
    fill(&mut result.repository, &meta.repository);
    fill(&mut result.language, &meta.language);
    fill(&mut result.function_name, &meta.function_name);
    fill(&mut result.class_name, &meta.class_name);
    fill(&mut result.start_line, &meta.start_line);
    fill(&mut result.end_line, &meta.end_line);
    fill(&mut result.bm25_score, &meta.bm25_score);
    fill(&mut result.semantic_score, &meta.semantic_score);
    fill(&mut result.vector_score, &meta.vector_score);
    fill(&mut result.reranker_score, &meta.reranker_score);
}

fn fill<T: Clone>(slot: &mut Option<T>, source: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(source);
    }
}

/// Best pre-fusion signal: BM25, then semantic, then vector, then the fused score.
pub fn resolve_original_score(result: &FusedResult) -> f64 {
    [result.bm25_score, result.semantic_score, result.vector_score]
        .into_iter()
        .flatten()
        .find(|s| s.is_finite())
        .unwrap_or(result.fused_score)
}
