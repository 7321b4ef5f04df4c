pub mod candidate;
pub mod context;
pub mod document;
pub mod factors;
pub mod feedback;
pub mod fused;
pub mod pipeline;
pub mod query;

pub use candidate::{Candidate, CandidateMetadata, StageOutput};
pub use context::{AssembledContext, Citation, CodeContext, FileAnalysis};
pub use document::{PatternMatch, PatternType, SearchDocument, VectorHit, VectorHitMetadata};
pub use factors::{Factor, FactorValues, RankingFactors, ValidatedFactor};
pub use feedback::{InteractionOutcome, InteractionRecord};
pub use fused::FusedResult;
pub use pipeline::{PipelineMetadata, PipelineResult, StageTiming};
pub use query::{Query, SearchMode};
