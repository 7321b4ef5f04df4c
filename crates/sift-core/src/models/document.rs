use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as returned by the search index, from either `search` or `get_document`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDocument {
    pub id: String,
    /// `@search.score`: BM25 for keyword queries.
    pub search_score: Option<f64>,
    /// `@search.rerankerScore`: semantic reranker score, 0..4.
    pub reranker_score: Option<f64>,
    /// Cross-encoder relevance, when the index computes one.
    pub cross_encoder_score: Option<f64>,
    pub highlights: Vec<String>,
    pub content: String,
    pub file_path: Option<String>,
    pub repository: Option<String>,
    pub language: Option<String>,
    pub function_name: Option<String>,
    pub class_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub imports: Vec<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub quality: Option<f64>,
    pub test_coverage: Option<f64>,
    pub complexity: Option<f64>,
    pub documentation: Option<String>,
    pub tags: Vec<String>,
}

/// File location attached to a vector hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorHitMetadata {
    pub file_path: Option<String>,
    pub repository: Option<String>,
    pub language: Option<String>,
    pub function_name: Option<String>,
    pub class_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
}

/// One result of an embedding similarity search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    pub score: f64,
    pub content: String,
    pub metadata: VectorHitMetadata,
}

/// Family of a recognized code pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Design,
    Architectural,
    ErrorHandling,
    Concurrency,
    Testing,
}

/// A recognized pattern with the evidence that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern_type: PatternType,
    pub pattern_name: String,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub matched_patterns: Vec<String>,
}
