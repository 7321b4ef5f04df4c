//! Semantic (reranked) search through the index's semantic configuration.

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::traits::{ISearchIndex, QueryType, SearchRequest};
use sift_core::StageKind;

use super::keyword_stage::{collect, owned, HIGHLIGHT_FIELDS, SEARCH_FIELDS};
use super::normalize::ScoreSlot;
use super::{base_filter, SearchStage, StageSettings};

pub struct SemanticStage {
    index: Arc<dyn ISearchIndex>,
    settings: StageSettings,
}

impl SemanticStage {
    pub fn new(index: Arc<dyn ISearchIndex>, settings: StageSettings) -> Self {
        Self { index, settings }
    }
}

#[async_trait]
impl SearchStage for SemanticStage {
    fn kind(&self) -> StageKind {
        StageKind::Semantic
    }

    async fn execute(
        &self,
        query: &Query,
        context: &CodeContext,
    ) -> Result<StageOutput, SearchError> {
        let request = SearchRequest {
            text: query.text.clone(),
            query_type: QueryType::Semantic,
            filter: base_filter(query, context).build(),
            top: self.settings.top_n,
            search_fields: owned(SEARCH_FIELDS),
            facets: Vec::new(),
            highlight_fields: owned(HIGHLIGHT_FIELDS),
            semantic_config: Some(self.settings.semantic_config.clone()),
        };
        let docs = self.index.search(&request).await?;
        Ok(collect(StageKind::Semantic, docs, ScoreSlot::Semantic, self.settings.top_n))
    }
}
