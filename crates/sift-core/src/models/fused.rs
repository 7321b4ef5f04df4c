use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::factors::{Factor, FactorValues};

/// A fused candidate hydrated into a full result.
///
/// `score` starts as the fused RRF+hybrid score and is replaced in place by the
/// final ranked score. `original_score` is the best pre-fusion signal and is only
/// used for tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: String,
    pub score: f64,
    /// Fused score before ranking replaced `score`.
    pub fused_score: f64,
    pub original_score: f64,
    pub code_snippet: String,
    pub file_path: Option<String>,
    pub repository: Option<String>,
    pub language: Option<String>,
    pub function_name: Option<String>,
    pub class_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub highlights: Vec<String>,
    pub imports: Vec<String>,
    pub bm25_score: Option<f64>,
    pub semantic_score: Option<f64>,
    pub vector_score: Option<f64>,
    pub reranker_score: Option<f64>,
    pub cross_encoder_score: Option<f64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub quality: Option<f64>,
    pub test_coverage: Option<f64>,
    pub complexity: Option<f64>,
    pub documentation: Option<String>,
    pub tags: Vec<String>,
    pub explanation: Option<String>,
    pub factor_values: Option<FactorValues>,
    /// Factor with the largest confidence-weighted contribution to `score`.
    pub dominant_factor: Option<Factor>,
}

impl FusedResult {
    /// Snippet is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.code_snippet.trim().is_empty()
    }

    pub fn snippet_len(&self) -> usize {
        self.code_snippet.chars().count()
    }

    pub fn line_range(&self) -> Option<(u32, u32)> {
        match (self.start_line, self.end_line) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(start), None) => Some((start, start)),
            _ => None,
        }
    }
}
