//! Retrieval stages and their concurrent executor.

pub mod blocking;
pub mod dependency_stage;
pub mod executor;
pub mod filter;
pub mod keyword_stage;
pub mod normalize;
pub mod pattern_stage;
pub mod semantic_stage;
pub mod vector_stage;

use async_trait::async_trait;
use sift_core::config::RetrievalConfig;
use sift_core::errors::SearchError;
use sift_core::models::{CodeContext, Query, StageOutput};
use sift_core::StageKind;

pub use blocking::BlockingSearchIndex;
pub use dependency_stage::DependencyStage;
pub use executor::{StageExecutor, StageRun};
pub use filter::FilterBuilder;
pub use keyword_stage::KeywordStage;
pub use pattern_stage::PatternStage;
pub use semantic_stage::SemanticStage;
pub use vector_stage::VectorStage;

/// One independent retrieval strategy.
#[async_trait]
pub trait SearchStage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Ranked candidates, best first, with captured metadata.
    async fn execute(&self, query: &Query, context: &CodeContext)
        -> Result<StageOutput, SearchError>;
}

/// Knobs shared by the index-backed stages.
#[derive(Debug, Clone)]
pub struct StageSettings {
    pub top_n: usize,
    pub keyword_variants: usize,
    pub semantic_config: String,
}

impl StageSettings {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            top_n: config.stage_top_n,
            keyword_variants: config.keyword_variants.max(1),
            semantic_config: config.semantic_config.clone(),
        }
    }
}

impl Default for StageSettings {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

/// Filter shared by every index-backed stage: repository/language scope plus
/// exclusion and exact-match terms.
pub(crate) fn base_filter(query: &Query, context: &CodeContext) -> FilterBuilder {
    let mut filter = FilterBuilder::new();
    if let Some(repo) = query.repository.as_deref().or(context.repository.as_deref()) {
        filter = filter.eq("repository", repo);
    }
    if let Some(language) = query.language.as_deref() {
        filter = filter.eq("language", language);
    }
    for term in &query.exclude_terms {
        filter = filter.exclude_term(term);
    }
    for term in &query.exact_terms {
        filter = filter.include_term(term);
    }
    filter
}
