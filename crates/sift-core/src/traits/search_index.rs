use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SearchError;
use crate::models::SearchDocument;

/// Query parser the index should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    #[default]
    Simple,
    Full,
    Semantic,
}

/// One call to the hosted full-text + vector index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
    pub query_type: QueryType,
    pub filter: Option<String>,
    pub top: usize,
    pub search_fields: Vec<String>,
    pub facets: Vec<String>,
    pub highlight_fields: Vec<String>,
    pub semantic_config: Option<String>,
}

/// Async search-index client.
#[async_trait]
pub trait ISearchIndex: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError>;

    async fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError>;
}

/// Synchronous search-index client. Wrap in a blocking adapter before handing it
/// to the async pipeline.
pub trait IBlockingSearchIndex: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError>;

    fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError>;
}
