use crate::intent::StageKind;

/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("all {attempted} retrieval stages failed")]
    AllStagesFailed { attempted: usize },

    #[error("no stage registered for {stage}")]
    StageMissing { stage: StageKind },

    #[error("hydration failed for {id}: {reason}")]
    HydrationFailed { id: String, reason: String },

    #[error("fallback search failed: {reason}")]
    FallbackFailed { reason: String },
}
