//! Intent classification from query text: tiered keyword matching, regex
//! structural patterns, and prefix/domain heuristics.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use sift_core::Intent;

const STRONG_WEIGHT: f64 = 3.0;
const MODERATE_WEIGHT: f64 = 1.5;
const CONTEXT_WEIGHT: f64 = 0.5;
const PATTERN_WEIGHT: f64 = 2.5;
const PREFIX_BONUS: f64 = 1.5;
const DOMAIN_HINT_BONUS: f64 = 1.0;

/// Minimum winning score; anything below falls back to [`DEFAULT_INTENT`].
pub const MIN_CONFIDENT_SCORE: f64 = 2.0;
pub const DEFAULT_INTENT: Intent = Intent::Understand;

struct KeywordTiers {
    strong: &'static [&'static str],
    moderate: &'static [&'static str],
    context: &'static [&'static str],
}

const KEYWORDS: &[(Intent, KeywordTiers)] = &[
    (
        Intent::Implement,
        KeywordTiers {
            strong: &["implement", "create", "build", "develop"],
            moderate: &[
                "add",
                "write",
                "generate",
                "new",
                "feature",
                "endpoint",
                "integrate",
                "support",
            ],
            context: &["api", "component", "module", "service", "handler"],
        },
    ),
    (
        Intent::Debug,
        KeywordTiers {
            strong: &[
                "fix",
                "debug",
                "bug",
                "error",
                "crash",
                "broken",
                "failing",
                "exception",
            ],
            moderate: &[
                "issue",
                "problem",
                "wrong",
                "fails",
                "unexpected",
                "stack trace",
                "not working",
                "traceback",
            ],
            context: &["log", "null", "undefined", "timeout", "warning"],
        },
    ),
    (
        Intent::Understand,
        KeywordTiers {
            strong: &["explain", "understand", "how does", "what is", "walk through"],
            moderate: &["how", "what", "why", "where", "overview", "flow", "works"],
            context: &["architecture", "purpose", "meaning", "role"],
        },
    ),
    (
        Intent::Refactor,
        KeywordTiers {
            strong: &[
                "refactor",
                "restructure",
                "clean up",
                "simplify",
                "extract",
                "reorganize",
            ],
            moderate: &["rename", "move", "split", "decouple", "duplicate", "improve"],
            context: &["readability", "maintainability", "smell", "legacy"],
        },
    ),
    (
        Intent::Test,
        KeywordTiers {
            strong: &["test", "tests", "unit test", "spec", "coverage", "mock"],
            moderate: &[
                "assert",
                "fixture",
                "pytest",
                "jest",
                "integration test",
                "verify",
            ],
            context: &["edge case", "scenario", "regression"],
        },
    ),
    (
        Intent::Document,
        KeywordTiers {
            strong: &[
                "document",
                "documentation",
                "docstring",
                "docstrings",
                "readme",
                "docs",
            ],
            moderate: &["describe", "annotate", "comment", "comments", "api reference", "jsdoc"],
            context: &["example", "usage", "tutorial"],
        },
    ),
];

const QUESTION_PREFIXES: &[&str] = &[
    "how", "what", "why", "where", "when", "which", "who", "is", "are", "does", "do", "can",
];
const IMPERATIVE_PREFIXES: &[&str] = &[
    "implement", "create", "add", "build", "write", "make", "generate", "develop",
];
const DEBUG_PREFIXES: &[&str] = &["fix", "resolve", "debug", "troubleshoot"];

const DOMAIN_HINTS: &[(Intent, &[&str])] = &[
    (Intent::Debug, &["segfault", "panic", "stacktrace", "nullpointerexception", "deadlock"]),
    (Intent::Test, &["pytest", "jest", "junit", "mocha", "unittest", "tdd"]),
    (Intent::Document, &["readme", "markdown", "sphinx", "javadoc", "changelog"]),
    (Intent::Refactor, &["dry", "solid", "coupling", "cohesion"]),
];

macro_rules! intent_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

intent_pattern!(RE_IMPLEMENT_LEAD, r"(?i)^\s*(please\s+)?(implement|create|build)\b");
intent_pattern!(RE_IMPLEMENT_HOWTO, r"(?i)\bhow (do|can|should) i (implement|create|build|add)\b");
intent_pattern!(RE_DEBUG_EXCEPTION_TYPE, r"\b\w+(Error|Exception)\b");
intent_pattern!(RE_DEBUG_WHY_FAILS, r"(?i)\bwhy (is|does|do)\b.*\b(fail|fails|failing|crash|crashes|throw|throws)\b");
intent_pattern!(RE_UNDERSTAND_LEAD, r"(?i)^\s*(how|what|why|where)\s+(does|is|are|do)\b");
intent_pattern!(RE_UNDERSTAND_PURPOSE, r"(?i)\bwhat('s| is) the (purpose|role|point) of\b");
intent_pattern!(RE_REFACTOR_CLEANUP, r"(?i)\b(clean|tidy)\s+up\b");
intent_pattern!(RE_REFACTOR_EXTRACT, r"(?i)\b(extract|split|break)\s+\w+(\s+\w+)?\s+into\b");
intent_pattern!(RE_TEST_WRITE, r"(?i)\b(write|add|generate|create)\s+(unit\s+|integration\s+|e2e\s+)?tests?\b");
intent_pattern!(RE_TEST_FOR, r"(?i)\btests?\s+for\b");
intent_pattern!(RE_DOCUMENT_WRITE, r"(?i)\b(write|add|generate|update)\s+(the\s+)?(docs|documentation|docstrings?|comments|readme)\b");
intent_pattern!(RE_DOCUMENT_THIS, r"(?i)\bdocument(ing)?\s+(the|this|these)\b");

static PATTERNS: &[(Intent, &LazyLock<Option<Regex>>)] = &[
    (Intent::Implement, &RE_IMPLEMENT_LEAD),
    (Intent::Implement, &RE_IMPLEMENT_HOWTO),
    (Intent::Debug, &RE_DEBUG_EXCEPTION_TYPE),
    (Intent::Debug, &RE_DEBUG_WHY_FAILS),
    (Intent::Understand, &RE_UNDERSTAND_LEAD),
    (Intent::Understand, &RE_UNDERSTAND_PURPOSE),
    (Intent::Refactor, &RE_REFACTOR_CLEANUP),
    (Intent::Refactor, &RE_REFACTOR_EXTRACT),
    (Intent::Test, &RE_TEST_WRITE),
    (Intent::Test, &RE_TEST_FOR),
    (Intent::Document, &RE_DOCUMENT_WRITE),
    (Intent::Document, &RE_DOCUMENT_THIS),
];

/// Deterministic keyword/regex intent classifier. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Highest-scoring intent if it reaches [`MIN_CONFIDENT_SCORE`], else
    /// [`DEFAULT_INTENT`]. Ties keep the earlier intent in [`Intent::ALL`].
    pub fn classify(&self, query: &str) -> Intent {
        let scores = self.scores(query);
        let mut best = DEFAULT_INTENT;
        let mut best_score = 0.0;
        for intent in Intent::ALL {
            let score = scores[intent.index()];
            if score > best_score {
                best = intent;
                best_score = score;
            }
        }
        if best_score >= MIN_CONFIDENT_SCORE {
            best
        } else {
            DEFAULT_INTENT
        }
    }

    /// Raw score per intent, indexed by [`Intent::index`].
    pub fn scores(&self, query: &str) -> [f64; Intent::COUNT] {
        let mut scores = [0.0; Intent::COUNT];
        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return scores;
        }
        let token_set: HashSet<&str> = tokens.iter().copied().collect();
        let padded = format!(" {} ", tokens.join(" "));

        for (intent, tiers) in KEYWORDS {
            let slot = &mut scores[intent.index()];
            *slot += STRONG_WEIGHT * count_hits(tiers.strong, &token_set, &padded);
            *slot += MODERATE_WEIGHT * count_hits(tiers.moderate, &token_set, &padded);
            *slot += CONTEXT_WEIGHT * count_hits(tiers.context, &token_set, &padded);
        }

        for (intent, pattern) in PATTERNS {
            if let Some(re) = pattern.as_ref() {
                if re.is_match(query) {
                    scores[intent.index()] += PATTERN_WEIGHT;
                }
            }
        }

        let first = tokens[0];
        if QUESTION_PREFIXES.contains(&first) {
            scores[Intent::Understand.index()] += PREFIX_BONUS;
        }
        if IMPERATIVE_PREFIXES.contains(&first) {
            scores[Intent::Implement.index()] += PREFIX_BONUS;
        }
        if DEBUG_PREFIXES.contains(&first) {
            scores[Intent::Debug.index()] += PREFIX_BONUS;
        }

        for (intent, hints) in DOMAIN_HINTS {
            if hints.iter().any(|h| token_set.contains(h)) {
                scores[intent.index()] += DOMAIN_HINT_BONUS;
            }
        }

        scores
    }
}

fn count_hits(keywords: &[&str], tokens: &HashSet<&str>, padded: &str) -> f64 {
    keywords
        .iter()
        .filter(|kw| {
            if kw.contains(' ') {
                padded.contains(&format!(" {kw} "))
            } else {
                tokens.contains(*kw)
            }
        })
        .count() as f64
}
