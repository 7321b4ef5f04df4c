use chrono::Utc;
use sift_core::models::{
    FactorValues, FusedResult, InteractionOutcome, InteractionRecord, SearchDocument, VectorHit,
    VectorHitMetadata,
};
use sift_core::Intent;

pub fn doc(id: &str, file_path: &str, content: &str) -> SearchDocument {
    SearchDocument {
        id: id.to_string(),
        content: content.to_string(),
        file_path: Some(file_path.to_string()),
        start_line: Some(1),
        end_line: Some(content.lines().count().max(1) as u32),
        ..Default::default()
    }
}

pub fn vector_hit(id: &str, file_path: &str, content: &str, score: f64) -> VectorHit {
    VectorHit {
        id: id.to_string(),
        score,
        content: content.to_string(),
        metadata: VectorHitMetadata {
            file_path: Some(file_path.to_string()),
            start_line: Some(1),
            end_line: Some(content.lines().count().max(1) as u32),
            ..Default::default()
        },
    }
}

/// A fused result with score, fused score and original score all set to `score`.
pub fn result(id: &str, file_path: &str, snippet: &str, score: f64) -> FusedResult {
    FusedResult {
        id: id.to_string(),
        score,
        fused_score: score,
        original_score: score,
        code_snippet: snippet.to_string(),
        file_path: Some(file_path.to_string()),
        ..Default::default()
    }
}

/// Feedback over `shown` (id, factor values) in display order.
pub fn feedback(
    intent: Intent,
    shown: Vec<(&str, [f64; 8])>,
    selected: &[&str],
    outcome: InteractionOutcome,
) -> InteractionRecord {
    InteractionRecord {
        query: format!("{intent} query"),
        intent,
        results_shown: shown
            .into_iter()
            .map(|(id, values)| (id.to_string(), FactorValues(values)))
            .collect(),
        results_selected: selected.iter().map(|s| s.to_string()).collect(),
        context: None,
        outcome,
        timestamp: Utc::now(),
    }
}
