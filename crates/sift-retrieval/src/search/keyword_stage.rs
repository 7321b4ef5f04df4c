//! BM25 keyword search over the enhanced variants.

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, SearchDocument, StageOutput};
use sift_core::traits::{ISearchIndex, QueryType, SearchRequest};
use sift_core::StageKind;

use super::normalize::{self, ScoreSlot};
use super::{base_filter, SearchStage, StageSettings};

pub(crate) const SEARCH_FIELDS: &[&str] = &["content", "function_name", "class_name"];
pub(crate) const HIGHLIGHT_FIELDS: &[&str] = &["content"];

pub struct KeywordStage {
    index: Arc<dyn ISearchIndex>,
    settings: StageSettings,
}

impl KeywordStage {
    pub fn new(index: Arc<dyn ISearchIndex>, settings: StageSettings) -> Self {
        Self { index, settings }
    }

    /// Top-K BM25 hits for a plain query, scores untouched.
    pub async fn top_hits(&self, query: &Query, top_k: usize) -> Result<Vec<SearchDocument>, SearchError> {
        let request = SearchRequest {
            text: query.text.clone(),
            query_type: QueryType::Simple,
            filter: base_filter(query, &CodeContext::default()).build(),
            top: top_k,
            search_fields: owned(SEARCH_FIELDS),
            facets: Vec::new(),
            highlight_fields: owned(HIGHLIGHT_FIELDS),
            semantic_config: None,
        };
        let mut docs = self.index.search(&request).await?;
        docs.truncate(top_k);
        Ok(docs)
    }

    fn request(&self, query: &Query, context: &CodeContext) -> SearchRequest {
        let text = query
            .variants()
            .into_iter()
            .take(self.settings.keyword_variants)
            .collect::<Vec<_>>()
            .join(" | ");
        SearchRequest {
            text,
            query_type: QueryType::Simple,
            filter: base_filter(query, context).build(),
            top: self.settings.top_n,
            search_fields: owned(SEARCH_FIELDS),
            facets: vec!["language".into()],
            highlight_fields: owned(HIGHLIGHT_FIELDS),
            semantic_config: None,
        }
    }
}

#[async_trait]
impl SearchStage for KeywordStage {
    fn kind(&self) -> StageKind {
        StageKind::Keyword
    }

    async fn execute(
        &self,
        query: &Query,
        context: &CodeContext,
    ) -> Result<StageOutput, SearchError> {
        let docs = self.index.search(&self.request(query, context)).await?;
        Ok(collect(StageKind::Keyword, docs, ScoreSlot::Bm25, self.settings.top_n))
    }
}

pub(crate) fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Normalize index documents into a capped stage output.
pub(crate) fn collect(
    stage: StageKind,
    docs: Vec<SearchDocument>,
    slot: ScoreSlot,
    top_n: usize,
) -> StageOutput {
    let mut output = StageOutput::empty(stage);
    for doc in docs.into_iter().take(top_n) {
        let (candidate, metadata) = normalize::from_document(doc, slot);
        output.push(candidate, metadata);
    }
    output
}
