//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

/// A retrieval stage failed and contributes an empty list.
pub fn stage_failed(stage: &str, error: &str) {
    tracing::warn!(
        event = "stage_failed",
        stage = %stage,
        error = %error,
        "retrieval stage failed; continuing without it"
    );
}

/// A circuit breaker tripped open.
pub fn circuit_opened(component: &str, consecutive_failures: u32) {
    tracing::warn!(
        event = "circuit_opened",
        component = %component,
        consecutive_failures = consecutive_failures,
        "circuit breaker opened"
    );
}

/// Every stage failed and the secondary searcher (or the empty result) was used.
pub fn fallback_used(reason: &str, results: usize) {
    tracing::warn!(
        event = "fallback_used",
        reason = %reason,
        results = results,
        "retrieval fell back"
    );
}

/// Ranking failed; unranked fused order is returned instead.
pub fn ranking_fallback(intent: &str, error: &str) {
    tracing::error!(
        event = "ranking_fallback",
        intent = %intent,
        error = %error,
        "ranking failed; returning fused order"
    );
}

/// A new adaptive weight snapshot was committed.
pub fn weights_recalculated(intent: &str, version: u64, feedback_count: usize) {
    tracing::info!(
        event = "weights_recalculated",
        intent = %intent,
        version = version,
        feedback_count = feedback_count,
        "adaptive weights recalculated"
    );
}

/// A pipeline run finished.
pub fn pipeline_completed(intent: &str, results: usize, elapsed_ms: u64, success: bool) {
    tracing::info!(
        event = "pipeline_completed",
        intent = %intent,
        results = results,
        elapsed_ms = elapsed_ms,
        success = success,
        "pipeline completed"
    );
}
