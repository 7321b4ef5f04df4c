use std::sync::Arc;

use moka::sync::Cache;
use sift_core::errors::{SiftError, SiftResult};
use sift_core::traits::ITokenizer;
use tiktoken_rs::CoreBPE;

const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Exact token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Load the cl100k_base encoding. Fails if the tokenizer tables cannot be built.
    pub fn new(cache_capacity: u64) -> SiftResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| SiftError::TokenizerUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        })
    }

    pub fn with_default_capacity() -> SiftResult<Self> {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Count tokens with blake3 content-hash caching.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}

impl ITokenizer for TokenCounter {
    fn count(&self, text: &str) -> usize {
        self.count_cached(text)
    }
}
