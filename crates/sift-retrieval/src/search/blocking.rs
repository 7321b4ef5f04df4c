//! Adapter running a synchronous search client on the blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::errors::SearchError;
use sift_core::models::SearchDocument;
use sift_core::traits::{IBlockingSearchIndex, ISearchIndex, SearchRequest};

/// Dispatches each call through `tokio::task::spawn_blocking` so a synchronous
/// client never stalls the async workers.
#[derive(Clone)]
pub struct BlockingSearchIndex {
    client: Arc<dyn IBlockingSearchIndex>,
}

impl BlockingSearchIndex {
    pub fn new(client: Arc<dyn IBlockingSearchIndex>) -> Self {
        Self { client }
    }
}

fn join_failed(err: tokio::task::JoinError) -> SearchError {
    SearchError::Unavailable {
        reason: format!("blocking search task failed: {err}"),
    }
}

#[async_trait]
impl ISearchIndex for BlockingSearchIndex {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
        let client = Arc::clone(&self.client);
        let request = request.clone();
        tokio::task::spawn_blocking(move || client.search(&request))
            .await
            .map_err(join_failed)?
    }

    async fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError> {
        let client = Arc::clone(&self.client);
        let id = id.to_string();
        tokio::task::spawn_blocking(move || client.get_document(&id))
            .await
            .map_err(join_failed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SyncIndex;

    impl IBlockingSearchIndex for SyncIndex {
        fn search(&self, request: &SearchRequest) -> Result<Vec<SearchDocument>, SearchError> {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(vec![SearchDocument {
                id: request.text.clone(),
                content: "fn found() {}".into(),
                ..Default::default()
            }])
        }

        fn get_document(&self, id: &str) -> Result<Option<SearchDocument>, SearchError> {
            if id == "boom" {
                panic!("client crashed");
            }
            Ok(None)
        }
    }

    #[tokio::test]
    async fn sync_client_results_pass_through() {
        let index = BlockingSearchIndex::new(Arc::new(SyncIndex));
        let request = SearchRequest {
            text: "needle".into(),
            ..Default::default()
        };
        let docs = index.search(&request).await.unwrap();
        assert_eq!(docs[0].id, "needle");
        assert_eq!(index.get_document("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn panicking_client_becomes_unavailable() {
        let index = BlockingSearchIndex::new(Arc::new(SyncIndex));
        let err = index.get_document("boom").await.unwrap_err();
        assert!(matches!(err, SearchError::Unavailable { .. }));
    }
}
