//! Deduplicated, token-bounded context assembly with citations.

use std::collections::HashSet;
use std::sync::Arc;

use sift_core::config::FusionConfig;
use sift_core::models::{AssembledContext, Citation, FusedResult};
use sift_core::traits::ITokenizer;
use sift_tokens::{HeuristicEstimator, TokenBudget};
use tracing::debug;

const SEPARATOR: &str = "\n\n";

/// Greedily packs results, in the order given, into `budget - safety_margin`
/// tokens, separators included. Stops at the first item that would overflow.
#[derive(Clone)]
pub struct ContextAssembler {
    budget: usize,
    safety_margin: usize,
    tokenizer: Arc<dyn ITokenizer>,
}

impl ContextAssembler {
    pub fn new(budget: usize, safety_margin: usize) -> Self {
        Self {
            budget,
            safety_margin,
            tokenizer: Arc::new(HeuristicEstimator),
        }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.context_budget, config.context_safety_margin)
    }

    /// Count tokens with an external tokenizer instead of the length heuristic.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn ITokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn effective_budget(&self) -> usize {
        self.budget.saturating_sub(self.safety_margin)
    }

    pub fn assemble(&self, results: &[FusedResult]) -> AssembledContext {
        let budget = self.effective_budget();
        let mut tokens = TokenBudget::new(self.tokenizer.as_ref(), budget, SEPARATOR);

        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut seen_content: HashSet<blake3::Hash> = HashSet::new();
        let mut blocks: Vec<String> = Vec::new();
        let mut citations = Vec::new();
        let mut duplicates_removed = 0usize;

        for result in results {
            if !seen_ids.insert(result.id.as_str()) {
                duplicates_removed += 1;
                continue;
            }
            if !seen_content.insert(content_hash(&result.code_snippet)) {
                duplicates_removed += 1;
                continue;
            }

            let block = render(result);
            if !tokens.try_charge(&block) {
                break;
            }
            citations.push(Citation {
                id: result.id.clone(),
                file_path: result.file_path.clone(),
                line_range: result.line_range(),
                score: result.score,
            });
            blocks.push(block);
        }

        let total_tokens = tokens.used();
        debug!(
            items = citations.len(),
            tokens = total_tokens,
            budget,
            duplicates_removed,
            "context assembled"
        );
        AssembledContext {
            text: blocks.join(SEPARATOR),
            citations,
            total_tokens,
            duplicates_removed,
        }
    }
}

impl std::fmt::Debug for ContextAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAssembler")
            .field("budget", &self.budget)
            .field("safety_margin", &self.safety_margin)
            .finish()
    }
}

/// Hash of the snippet with whitespace collapsed and case folded.
fn content_hash(content: &str) -> blake3::Hash {
    let normalized = content
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    blake3::hash(normalized.as_bytes())
}

fn render(result: &FusedResult) -> String {
    let location = match (result.file_path.as_deref(), result.line_range()) {
        (Some(path), Some((start, end))) => format!("// {path}:{start}-{end}\n"),
        (Some(path), None) => format!("// {path}\n"),
        _ => String::new(),
    };
    format!("{location}{}", result.code_snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, snippet: &str) -> FusedResult {
        FusedResult {
            id: id.into(),
            score: 0.5,
            code_snippet: snippet.into(),
            ..Default::default()
        }
    }

    #[test]
    fn near_identical_snippets_collapse() {
        let assembler = ContextAssembler::new(3_000, 200);
        let ctx = assembler.assemble(&[
            result("a", "def f():\n    return 1"),
            result("b", "def  f():   return 1"),
            result("a", "something else"),
        ]);
        assert_eq!(ctx.citations.len(), 1);
        assert_eq!(ctx.duplicates_removed, 2);
    }

    #[test]
    fn stops_at_first_overflow() {
        // 400 chars → 100 tokens each plus one per separator; 250 usable fit two.
        let assembler = ContextAssembler::new(300, 50);
        let items: Vec<FusedResult> = (0..4)
            .map(|i| result(&format!("r{i}"), &format!("{i}{}", "x".repeat(399))))
            .collect();
        let ctx = assembler.assemble(&items);
        assert_eq!(ctx.citations.len(), 2);
        assert_eq!(ctx.total_tokens, 201);
    }

    #[test]
    fn citation_carries_location() {
        let mut item = result("a", "fn a() {}");
        item.file_path = Some("/src/a.rs".into());
        item.start_line = Some(3);
        item.end_line = Some(9);
        let ctx = ContextAssembler::new(3_000, 200).assemble(&[item]);
        assert_eq!(ctx.citations[0].line_range, Some((3, 9)));
        assert!(ctx.text.starts_with("// /src/a.rs:3-9\n"));
    }

    struct CharCount;

    impl ITokenizer for CharCount {
        fn count(&self, text: &str) -> usize {
            text.chars().count()
        }
    }

    #[test]
    fn separators_count_against_the_budget() {
        // Two 10-char blocks need 22 tokens once joined; 21 only fits one.
        let assembler = ContextAssembler::new(21, 0).with_tokenizer(Arc::new(CharCount));
        let ctx = assembler.assemble(&[result("a", &"a".repeat(10)), result("b", &"b".repeat(10))]);
        assert_eq!(ctx.citations.len(), 1);
        assert_eq!(ctx.total_tokens, 10);

        let roomy = ContextAssembler::new(22, 0).with_tokenizer(Arc::new(CharCount));
        let ctx = roomy.assemble(&[result("a", &"a".repeat(10)), result("b", &"b".repeat(10))]);
        assert_eq!(ctx.citations.len(), 2);
        assert_eq!(ctx.total_tokens, ctx.text.chars().count());
    }
}
