use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Bounded document cache used during hydration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached documents.
    pub capacity: u64,
    /// Time-to-live per cached document.
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_DOCUMENT_CACHE_CAPACITY,
            ttl_secs: defaults::DEFAULT_DOCUMENT_CACHE_TTL_SECS,
        }
    }
}
