use async_trait::async_trait;

use crate::errors::SearchError;
use crate::models::VectorHit;

/// Embedding similarity search.
#[async_trait]
pub trait IVectorSearch: Send + Sync {
    async fn vector_search(
        &self,
        text: &str,
        filter: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<VectorHit>, SearchError>;
}
