//! Dependency search: code that imports what the current file imports, or the
//! current module itself.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::traits::{ISearchIndex, QueryType, SearchRequest};
use sift_core::StageKind;

use super::keyword_stage::{collect, owned, HIGHLIGHT_FIELDS, SEARCH_FIELDS};
use super::normalize::ScoreSlot;
use super::{base_filter, SearchStage, StageSettings};

pub struct DependencyStage {
    index: Arc<dyn ISearchIndex>,
    settings: StageSettings,
}

impl DependencyStage {
    pub fn new(index: Arc<dyn ISearchIndex>, settings: StageSettings) -> Self {
        Self { index, settings }
    }
}

/// Context imports plus the current file's module name.
fn dependency_terms(query: &Query, context: &CodeContext) -> Vec<String> {
    let mut terms = context.imports.clone();
    let current = query.current_file.as_deref().or(context.current_file.as_deref());
    if let Some(stem) = current
        .and_then(|p| Path::new(p).file_stem())
        .and_then(|s| s.to_str())
    {
        if !terms.iter().any(|t| t == stem) {
            terms.push(stem.to_string());
        }
    }
    terms
}

#[async_trait]
impl SearchStage for DependencyStage {
    fn kind(&self) -> StageKind {
        StageKind::Dependency
    }

    async fn execute(
        &self,
        query: &Query,
        context: &CodeContext,
    ) -> Result<StageOutput, SearchError> {
        let terms = dependency_terms(query, context);
        if terms.is_empty() {
            return Ok(StageOutput::empty(StageKind::Dependency));
        }

        let request = SearchRequest {
            text: query.text.clone(),
            query_type: QueryType::Simple,
            filter: base_filter(query, context).any_of("imports", &terms).build(),
            top: self.settings.top_n,
            search_fields: owned(SEARCH_FIELDS),
            facets: Vec::new(),
            highlight_fields: owned(HIGHLIGHT_FIELDS),
            semantic_config: None,
        };
        let docs = self.index.search(&request).await?;
        Ok(collect(StageKind::Dependency, docs, ScoreSlot::None, self.settings.top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_include_current_module() {
        let query = Query::new("x").with_current_file("src/cache/redis_store.py");
        let context = CodeContext {
            imports: vec!["redis".into()],
            ..Default::default()
        };
        assert_eq!(
            dependency_terms(&query, &context),
            vec!["redis".to_string(), "redis_store".to_string()]
        );
    }

    #[test]
    fn no_terms_without_imports_or_file() {
        assert!(dependency_terms(&Query::new("x"), &CodeContext::default()).is_empty());
    }
}
