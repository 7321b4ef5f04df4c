//! Fusion: budget pruning, weighted RRF, metadata accumulation and hydration.

pub mod hydration;
pub mod metadata;
pub mod pruning;
pub mod rrf;

use std::sync::Arc;

use sift_core::config::{CacheConfig, FusionConfig};
use sift_core::models::{FusedResult, StageOutput};
use sift_core::traits::ISearchIndex;
use tracing::debug;

pub use hydration::{resolve_original_score, DocumentCache, Hydrator};

/// Combines stage outputs (in stage-list order) into one hydrated ranking.
#[derive(Clone)]
pub struct FusionEngine {
    config: FusionConfig,
    hydrator: Hydrator,
}

impl FusionEngine {
    /// Fusion without document fetching: results are built from stage metadata.
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            hydrator: Hydrator::new(None, &CacheConfig::default()),
        }
    }

    /// Fusion that hydrates through `index`, cached per `cache`.
    pub fn with_documents(
        config: FusionConfig,
        index: Arc<dyn ISearchIndex>,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            config,
            hydrator: Hydrator::new(Some(index), cache),
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn documents(&self) -> &DocumentCache {
        self.hydrator.cache()
    }

    /// Prune, fuse, hydrate. Empty when no stage produced a surviving candidate.
    pub async fn fuse(&self, mut outputs: Vec<StageOutput>) -> Vec<FusedResult> {
        pruning::prune_to_budget(
            &mut outputs,
            self.config.pruning_budget,
            self.config.tokens_per_document,
        );
        let fused = rrf::fuse_rankings(&outputs, &self.config);
        if fused.is_empty() {
            return Vec::new();
        }
        let metadata = metadata::accumulate(&outputs);
        let results = self.hydrator.hydrate(&fused, &metadata).await;
        debug!(fused = fused.len(), hydrated = results.len(), "fusion complete");
        results
    }
}
