use crate::errors::SiftResult;
use crate::models::FileAnalysis;

/// AST-based analyzer used only to enrich the ambient context.
pub trait ICodeAnalyzer: Send + Sync {
    fn analyze(&self, file_path: &str) -> SiftResult<FileAnalysis>;
}
