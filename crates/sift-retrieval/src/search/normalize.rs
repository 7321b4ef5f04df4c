//! Convert raw index and vector hits into the single candidate shape.

use sift_core::models::{Candidate, CandidateMetadata, SearchDocument, VectorHit};

/// Which metadata score slot a stage's score belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSlot {
    Bm25,
    Semantic,
    None,
}

pub fn from_document(doc: SearchDocument, slot: ScoreSlot) -> (Candidate, CandidateMetadata) {
    let score = match slot {
        ScoreSlot::Semantic => doc.reranker_score.or(doc.search_score),
        _ => doc.search_score,
    };
    let metadata = CandidateMetadata {
        content: Some(doc.content),
        file_path: doc.file_path,
        repository: doc.repository,
        language: doc.language,
        function_name: doc.function_name,
        class_name: doc.class_name,
        start_line: doc.start_line,
        end_line: doc.end_line,
        highlights: doc.highlights,
        imports: doc.imports,
        bm25_score: (slot == ScoreSlot::Bm25).then_some(score).flatten(),
        semantic_score: (slot == ScoreSlot::Semantic).then_some(score).flatten(),
        vector_score: None,
        reranker_score: doc.reranker_score,
    };
    (Candidate::new(doc.id, sanitize(score)), metadata)
}

pub fn from_vector_hit(hit: VectorHit) -> (Candidate, CandidateMetadata) {
    let metadata = CandidateMetadata {
        content: Some(hit.content),
        file_path: hit.metadata.file_path,
        repository: hit.metadata.repository,
        language: hit.metadata.language,
        function_name: hit.metadata.function_name,
        class_name: hit.metadata.class_name,
        start_line: hit.metadata.start_line,
        end_line: hit.metadata.end_line,
        vector_score: Some(hit.score),
        ..Default::default()
    };
    (Candidate::new(hit.id, sanitize(Some(hit.score))), metadata)
}

/// Missing or non-finite stage scores count as zero.
fn sanitize(score: Option<f64>) -> f64 {
    score.filter(|s| s.is_finite()).unwrap_or(0.0)
}
