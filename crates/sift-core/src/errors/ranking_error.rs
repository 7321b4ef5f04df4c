use crate::intent::Intent;

/// Ranking subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("no weights configured for intent {intent}")]
    MissingWeights { intent: Intent },

    #[error("invalid weights for {intent}: {reason}")]
    InvalidWeights { intent: Intent, reason: String },

    #[error("ranking failed: {reason}")]
    Failed { reason: String },
}
