use crate::errors::SiftResult;
use crate::intent::Intent;
use crate::models::InteractionRecord;

/// Persistent sink for interaction records.
pub trait IFeedbackStore: Send + Sync {
    fn record(&self, record: &InteractionRecord) -> SiftResult<()>;

    /// Most recent records for an intent, newest first.
    fn recent(&self, intent: Intent, limit: usize) -> SiftResult<Vec<InteractionRecord>>;
}
