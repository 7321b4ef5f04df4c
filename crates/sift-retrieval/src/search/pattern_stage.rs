//! Structural pattern search: recognize patterns in the query, then search
//! for code mentioning them.

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::traits::{IPatternRecognizer, ISearchIndex, QueryType, SearchRequest};
use sift_core::StageKind;

use super::keyword_stage::{collect, owned, HIGHLIGHT_FIELDS};
use super::normalize::ScoreSlot;
use super::{base_filter, SearchStage, StageSettings};

pub struct PatternStage {
    index: Arc<dyn ISearchIndex>,
    recognizer: Arc<dyn IPatternRecognizer>,
    settings: StageSettings,
}

impl PatternStage {
    pub fn new(
        index: Arc<dyn ISearchIndex>,
        recognizer: Arc<dyn IPatternRecognizer>,
        settings: StageSettings,
    ) -> Self {
        Self {
            index,
            recognizer,
            settings,
        }
    }
}

#[async_trait]
impl SearchStage for PatternStage {
    fn kind(&self) -> StageKind {
        StageKind::Pattern
    }

    async fn execute(
        &self,
        query: &Query,
        context: &CodeContext,
    ) -> Result<StageOutput, SearchError> {
        let matches = self.recognizer.recognize(&query.text, Some(context));
        if matches.is_empty() {
            return Ok(StageOutput::empty(StageKind::Pattern));
        }

        let text = matches
            .iter()
            .map(|m| m.pattern_name.replace('_', " "))
            .collect::<Vec<_>>()
            .join(" | ");
        let request = SearchRequest {
            text,
            query_type: QueryType::Simple,
            filter: base_filter(query, context).build(),
            top: self.settings.top_n,
            search_fields: owned(&["content"]),
            facets: Vec::new(),
            highlight_fields: owned(HIGHLIGHT_FIELDS),
            semantic_config: None,
        };
        let docs = self.index.search(&request).await?;
        Ok(collect(StageKind::Pattern, docs, ScoreSlot::None, self.settings.top_n))
    }
}
