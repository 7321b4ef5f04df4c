use crate::models::{CodeContext, PatternMatch};

/// Structural pattern recognition over code or query text.
pub trait IPatternRecognizer: Send + Sync {
    fn recognize(&self, code: &str, context: Option<&CodeContext>) -> Vec<PatternMatch>;
}
