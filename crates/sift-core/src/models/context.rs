use serde::{Deserialize, Serialize};

/// Ambient code context for one query. Read-only input to ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeContext {
    pub current_file: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub repository: Option<String>,
    pub imports: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub project_root: Option<String>,
    pub open_files: Vec<String>,
}

impl CodeContext {
    /// True when nothing useful for enrichment or ranking is known.
    pub fn is_empty(&self) -> bool {
        self.current_file.is_none()
            && self.language.is_none()
            && self.framework.is_none()
            && self.repository.is_none()
            && self.imports.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
            && self.project_root.is_none()
            && self.open_files.is_empty()
    }

    /// Fill unset fields from an analyzer result without replacing caller-supplied data.
    pub fn absorb_analysis(&mut self, analysis: FileAnalysis) {
        if self.language.is_none() {
            self.language = analysis.language;
        }
        if self.imports.is_empty() {
            self.imports = analysis.imports;
        }
        if self.functions.is_empty() {
            self.functions = analysis.functions;
        }
        if self.classes.is_empty() {
            self.classes = analysis.classes;
        }
    }
}

/// Output of a code analyzer for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub language: Option<String>,
    pub imports: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

/// Source reference for one item placed in the context window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub file_path: Option<String>,
    pub line_range: Option<(u32, u32)>,
    pub score: f64,
}

/// Deduplicated, token-bounded context window built from fused results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub text: String,
    pub citations: Vec<Citation>,
    pub total_tokens: usize,
    /// Items skipped as duplicates (by id or normalized content).
    pub duplicates_removed: usize,
}
