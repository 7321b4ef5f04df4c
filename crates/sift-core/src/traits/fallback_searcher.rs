use async_trait::async_trait;

use crate::errors::SearchError;
use crate::models::{FusedResult, Query};

/// Single-strategy searcher used when every retrieval stage fails.
#[async_trait]
pub trait IFallbackSearcher: Send + Sync {
    async fn search(&self, query: &Query) -> Result<Vec<FusedResult>, SearchError>;
}
