use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::intent::StageKind;

/// A ranked entry from one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Per-candidate data captured while stages run. Accumulates across stages:
/// a later stage only fills fields that are still empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub content: Option<String>,
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
}

impl CandidateMetadata {
    /// Fill every unset field from `other`. Populated fields are never overwritten.
    pub fn merge_from(&mut self, other: &CandidateMetadata) {
        fill(&mut self.content, &other.content);
        fill(&mut self.file_path, &other.file_path);
        fill(&mut self.repository, &other.repository);
        fill(&mut self.language, &other.language);
        fill(&mut self.function_name, &other.function_name);
        fill(&mut self.class_name, &other.class_name);
        fill(&mut self.start_line, &other.start_line);
        fill(&mut self.end_line, &other.end_line);
        fill(&mut self.bm25_score, &other.bm25_score);
        fill(&mut self.semantic_score, &other.semantic_score);
        fill(&mut self.vector_score, &other.vector_score);
        fill(&mut self.reranker_score, &other.reranker_score);
        if self.highlights.is_empty() {
            self.highlights = other.highlights.clone();
        }
        if self.imports.is_empty() {
            self.imports = other.imports.clone();
        }
    }

    /// Content is present and not whitespace-only.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, source: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(source);
    }
}

/// Normalized output of one stage: ordered candidates plus captured metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    pub stage: StageKind,
    pub candidates: Vec<Candidate>,
    pub metadata: HashMap<String, CandidateMetadata>,
}

impl StageOutput {
    pub fn empty(stage: StageKind) -> Self {
        Self {
            stage,
            candidates: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Append a candidate and record its metadata, merging into any earlier entry.
    pub fn push(&mut self, candidate: Candidate, metadata: CandidateMetadata) {
        self.metadata
            .entry(candidate.id.clone())
            .and_modify(|existing| existing.merge_from(&metadata))
            .or_insert(metadata);
        self.candidates.push(candidate);
    }

    /// Keep the first `n` candidates; metadata for dropped ids is discarded.
    pub fn truncate(&mut self, n: usize) {
        if self.candidates.len() <= n {
            return;
        }
        self.candidates.truncate(n);
        let kept: std::collections::HashSet<&str> =
            self.candidates.iter().map(|c| c.id.as_str()).collect();
        self.metadata.retain(|id, _| kept.contains(id.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_fills_gaps_without_overwriting() {
        let mut first = CandidateMetadata {
            bm25_score: Some(7.5),
            file_path: Some("/a/x.py".into()),
            ..Default::default()
        };
        let second = CandidateMetadata {
            bm25_score: Some(1.0),
            vector_score: Some(0.9),
            content: Some("def x(): pass".into()),
            file_path: Some("/other.py".into()),
            ..Default::default()
        };
        first.merge_from(&second);
        assert_eq!(first.bm25_score, Some(7.5));
        assert_eq!(first.vector_score, Some(0.9));
        assert_eq!(first.file_path.as_deref(), Some("/a/x.py"));
        assert!(first.has_content());
    }

    #[test]
    fn whitespace_content_is_not_content() {
        let meta = CandidateMetadata {
            content: Some("  \n\t ".into()),
            ..Default::default()
        };
        assert!(!meta.has_content());
    }

    #[test]
    fn truncate_drops_metadata_of_removed_candidates() {
        let mut out = StageOutput::empty(StageKind::Keyword);
        out.push(Candidate::new("a", 3.0), CandidateMetadata::default());
        out.push(Candidate::new("b", 2.0), CandidateMetadata::default());
        out.truncate(1);
        assert_eq!(out.len(), 1);
        assert!(out.metadata.contains_key("a"));
        assert!(!out.metadata.contains_key("b"));
    }
}
