use std::collections::HashMap;

use sift_core::models::{CandidateMetadata, StageOutput};

/// Merge per-stage metadata by id. Earlier stages win; later ones only fill gaps.
pub fn accumulate(outputs: &[StageOutput]) -> HashMap<String, CandidateMetadata> {
    let mut merged: HashMap<String, CandidateMetadata> = HashMap::new();
    for output in outputs {
        for (id, metadata) in &output.metadata {
            merged
                .entry(id.clone())
                .and_modify(|existing| existing.merge_from(metadata))
                .or_insert_with(|| metadata.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use sift_core::models::Candidate;
    use sift_core::StageKind;

    use super::*;

    #[test]
    fn scores_from_every_stage_are_collected() {
        let mut vector = StageOutput::empty(StageKind::Vector);
        vector.push(
            Candidate::new("a", 0.9),
            CandidateMetadata {
                vector_score: Some(0.9),
                ..Default::default()
            },
        );
        let mut keyword = StageOutput::empty(StageKind::Keyword);
        keyword.push(
            Candidate::new("a", 7.0),
            CandidateMetadata {
                bm25_score: Some(7.0),
                content: Some("fn a() {}".into()),
                ..Default::default()
            },
        );
        let merged = accumulate(&[vector, keyword]);
        let meta = &merged["a"];
        assert_eq!(meta.vector_score, Some(0.9));
        assert_eq!(meta.bm25_score, Some(7.0));
        assert!(meta.has_content());
    }
}
