//! IntentEngine: classify a query, then route it to an ordered stage list.

pub mod classifier;
pub mod stage_selection;

use sift_core::models::Query;
use sift_core::{Intent, StageKind};

pub use classifier::IntentClassifier;

/// Coordinates intent classification and stage selection.
#[derive(Debug, Default)]
pub struct IntentEngine {
    classifier: IntentClassifier,
}

impl IntentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit intent on the query wins; otherwise classify the text.
    pub fn classify(&self, query: &Query) -> Intent {
        query
            .intent
            .unwrap_or_else(|| self.classifier.classify(&query.text))
    }

    /// Stages to run for an intent, in fusion-weight order.
    pub fn stages(&self, intent: Intent) -> &'static [StageKind] {
        stage_selection::stages_for(intent)
    }
}
