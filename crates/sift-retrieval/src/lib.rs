//! # sift-retrieval
//!
//! The query engine. Multi-stage candidate gathering, weighted fusion, then
//! contextual re-ranking with per-result explanations.
//!
//! ## Architecture
//!
//! ```text
//! SearchPipeline
//! ├── IntentEngine
//! │   ├── Classifier (keyword tiers + regex + prefix heuristics)
//! │   └── StageSelection (intent → ordered stage list)
//! ├── QueryEnhancer
//! │   ├── Context injection (imports, functions, classes)
//! │   ├── Intent terms (boost / exclude)
//! │   ├── Synonyms + abbreviations
//! │   └── Variants (swap, reorder, question toggle)
//! ├── RetrievalEngine
//! │   ├── StageExecutor (parallel tasks, timeout, retry, circuit breaker)
//! │   │   ├── VectorStage
//! │   │   ├── KeywordStage (BM25)
//! │   │   ├── SemanticStage
//! │   │   ├── PatternStage
//! │   │   └── DependencyStage
//! │   ├── FusionEngine
//! │   │   ├── Budget pruning
//! │   │   ├── Weighted RRF (hybrid rank + score)
//! │   │   └── Hydration (bounded document cache)
//! │   ├── ContextAssembler (dedup + token budget + citations)
//! │   └── Fallback searcher
//! ├── Ranker
//! │   ├── ContextualRanker (8 validated factors, 4-level tie-break)
//! │   └── AdaptiveRanker (snapshot weights, background recalculation)
//! └── PatternRegistry
//! ```

pub mod adaptive;
pub mod budget;
pub mod engine;
pub mod expansion;
pub mod fusion;
pub mod intent;
pub mod patterns;
pub mod pipeline;
pub mod ranking;
pub mod resilience;
pub mod search;

pub use adaptive::AdaptiveRanker;
pub use budget::ContextAssembler;
pub use engine::{RetrievalEngine, RetrievalOutcome};
pub use expansion::{EnhancedQuery, QueryEnhancer};
pub use fusion::FusionEngine;
pub use intent::IntentEngine;
pub use patterns::PatternRegistry;
pub use pipeline::{PipelineBuilder, SearchPipeline};
pub use ranking::{ContextualRanker, Ranker};
pub use search::{SearchStage, StageExecutor};
