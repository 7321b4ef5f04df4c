use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::intent::Intent;

/// How the pipeline should retrieve for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Multi-stage retrieval, fusion and contextual ranking.
    #[default]
    Fused,
    /// Top-K keyword hits with the engine's BM25 score preserved unmodified.
    KeywordOnly,
}

/// A single search request. Built once per pipeline run and not mutated afterwards;
/// enhancement produces a new value via [`Query::enhanced`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub intent: Option<Intent>,
    pub current_file: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub repository: Option<String>,
    pub exclude_terms: Vec<String>,
    pub exact_terms: Vec<String>,
    /// Enhanced variants; the first entry is always the original text once enhanced.
    pub queries: Vec<String>,
    pub top_k: usize,
    pub mode: SearchMode,
    /// Overall deadline for the run, in milliseconds.
    pub deadline_ms: Option<u64>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: None,
            current_file: None,
            language: None,
            framework: None,
            repository: None,
            exclude_terms: Vec::new(),
            exact_terms: Vec::new(),
            queries: Vec::new(),
            top_k: defaults::DEFAULT_RESULT_LIMIT,
            mode: SearchMode::Fused,
            deadline_ms: None,
        }
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_current_file(mut self, path: impl Into<String>) -> Self {
        self.current_file = Some(path.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_exact_terms(mut self, terms: Vec<String>) -> Self {
        self.exact_terms = terms;
        self
    }

    pub fn with_exclude_terms(mut self, terms: Vec<String>) -> Self {
        self.exclude_terms = terms;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_deadline(mut self, budget: Duration) -> Self {
        self.deadline_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn keyword_only(mut self) -> Self {
        self.mode = SearchMode::KeywordOnly;
        self
    }

    /// Return a copy carrying the classified intent, enhanced variants and merged
    /// exclusion terms.
    pub fn enhanced(&self, intent: Intent, queries: Vec<String>, exclude_terms: Vec<String>) -> Self {
        let mut next = self.clone();
        next.intent = Some(intent);
        next.queries = queries;
        for term in exclude_terms {
            if !next
                .exclude_terms
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&term))
            {
                next.exclude_terms.push(term);
            }
        }
        next
    }

    /// Enhanced variants, or the raw text when the query has not been enhanced.
    pub fn variants(&self) -> Vec<&str> {
        if self.queries.is_empty() {
            vec![self.text.as_str()]
        } else {
            self.queries.iter().map(String::as_str).collect()
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
