//! Embedding similarity search.

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::traits::IVectorSearch;
use sift_core::StageKind;

use super::normalize;
use super::{base_filter, SearchStage, StageSettings};

pub struct VectorStage {
    client: Arc<dyn IVectorSearch>,
    settings: StageSettings,
}

impl VectorStage {
    pub fn new(client: Arc<dyn IVectorSearch>, settings: StageSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl SearchStage for VectorStage {
    fn kind(&self) -> StageKind {
        StageKind::Vector
    }

    async fn execute(
        &self,
        query: &Query,
        context: &CodeContext,
    ) -> Result<StageOutput, SearchError> {
        let filter = base_filter(query, context).build();
        let hits = self
            .client
            .vector_search(&query.text, filter.as_deref(), self.settings.top_n)
            .await?;

        let mut output = StageOutput::empty(StageKind::Vector);
        for hit in hits.into_iter().take(self.settings.top_n) {
            let (candidate, metadata) = normalize::from_vector_hit(hit);
            output.push(candidate, metadata);
        }
        Ok(output)
    }
}
