use std::fmt;

use serde::{Deserialize, Serialize};

/// The six query intents. Drives stage selection and ranking weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Implement,
    Debug,
    Understand,
    Refactor,
    Test,
    Document,
}

impl Intent {
    /// Total number of intent types.
    pub const COUNT: usize = 6;

    /// All variants for iteration, in classification tie-break order.
    pub const ALL: [Intent; 6] = [
        Self::Implement,
        Self::Debug,
        Self::Understand,
        Self::Refactor,
        Self::Test,
        Self::Document,
    ];

    /// Position in [`Intent::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implement => "implement",
            Self::Debug => "debug",
            Self::Understand => "understand",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independent retrieval strategy contributing a ranked candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Vector,
    Keyword,
    Semantic,
    Pattern,
    Dependency,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        Self::Vector,
        Self::Keyword,
        Self::Semantic,
        Self::Pattern,
        Self::Dependency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
            Self::Pattern => "pattern",
            Self::Dependency => "dependency",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
