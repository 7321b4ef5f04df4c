use serde::{Deserialize, Serialize};

use super::context::AssembledContext;
use super::fused::FusedResult;
use crate::intent::{Intent, StageKind};

/// Wall-clock time spent in one pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub step: String,
    pub elapsed_ms: u64,
}

/// Diagnostics attached to every pipeline result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub intent: Option<Intent>,
    pub enhanced_queries: Vec<String>,
    pub exclude_terms: Vec<String>,
    pub stages_run: Vec<StageKind>,
    pub stages_failed: Vec<StageKind>,
    pub used_fallback: bool,
    pub ranked: bool,
    pub candidates_fused: usize,
    pub results_returned: usize,
    pub timings: Vec<StageTiming>,
    pub total_ms: u64,
}

/// The pipeline's answer. All failure is reified here; the pipeline never returns `Err`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    pub results: Vec<FusedResult>,
    pub context: AssembledContext,
    pub error: Option<String>,
    pub metadata: PipelineMetadata,
}
