//! Test fixtures for sift: in-memory and fault-injecting collaborators, small
//! builders, and the golden corpus loader.

mod builders;
mod fakes;

pub use builders::{doc, feedback, result, vector_hit};
pub use fakes::{
    FailingAnalyzer, FailingSearchIndex, FailingVectorSearch, FlakySearchIndex,
    InMemorySearchIndex, InMemoryVectorSearch, RecordingFeedbackStore, SlowSearchIndex,
    StaticFallback, StubAnalyzer,
};

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use sift_core::models::{SearchDocument, VectorHit};

/// Root of the golden fixture files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// The golden code corpus served by the in-memory index.
pub fn corpus() -> Vec<SearchDocument> {
    load_fixture("corpus.json")
}

/// Vector hits paired with the golden corpus.
pub fn vector_hits() -> Vec<VectorHit> {
    load_fixture("vector_hits.json")
}
