mod code_analyzer;
mod fallback_searcher;
mod feedback_store;
mod pattern_recognizer;
mod search_index;
mod tokenizer;
mod vector_search;

pub use code_analyzer::ICodeAnalyzer;
pub use fallback_searcher::IFallbackSearcher;
pub use feedback_store::IFeedbackStore;
pub use pattern_recognizer::IPatternRecognizer;
pub use search_index::{IBlockingSearchIndex, ISearchIndex, QueryType, SearchRequest};
pub use tokenizer::ITokenizer;
pub use vector_search::IVectorSearch;
