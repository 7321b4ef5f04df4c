use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::ranking::WeightTable;

/// Latest committed weight table. Readers clone the `Arc` and never wait on a
/// recalculation; the worker swaps in a whole new table.
#[derive(Debug)]
pub struct WeightSnapshot {
    current: RwLock<Arc<WeightTable>>,
    version: AtomicU64,
}

impl WeightSnapshot {
    pub fn new(table: WeightTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            version: AtomicU64::new(0),
        }
    }

    pub fn load(&self) -> Arc<WeightTable> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a new table; returns the new version.
    pub fn store(&self, table: WeightTable) -> u64 {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(table);
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use sift_core::models::Factor;
    use sift_core::Intent;

    use super::*;

    #[test]
    fn store_bumps_version_and_old_readers_keep_their_copy() {
        let snapshot = WeightSnapshot::new(WeightTable::default());
        let before = snapshot.load();

        let mut next = WeightTable::default();
        let mut row = next.get(Intent::Debug);
        row.0[Factor::TextRelevance.index()] += 0.05;
        row.0[Factor::SemanticSimilarity.index()] -= 0.05;
        next.set(Intent::Debug, row);

        assert_eq!(snapshot.store(next.clone()), 1);
        assert_eq!(snapshot.version(), 1);
        assert_eq!(*before, WeightTable::default());
        assert_eq!(*snapshot.load(), next);
    }
}
