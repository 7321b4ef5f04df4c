//! Code-aware term substitution: abbreviations, language and framework
//! vocabulary, and general synonym swaps.
//!
//! E.g. "auth db config" → "authentication database configuration".

/// Common code abbreviations and their expansions.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("auth", "authentication"),
    ("db", "database"),
    ("config", "configuration"),
    ("cfg", "configuration"),
    ("err", "error"),
    ("msg", "message"),
    ("perf", "performance"),
    ("impl", "implementation"),
    ("fn", "function"),
    ("func", "function"),
    ("repo", "repository"),
    ("env", "environment"),
    ("req", "request"),
    ("res", "response"),
    ("util", "utility"),
    ("utils", "utilities"),
    ("deps", "dependencies"),
    ("async", "asynchronous"),
    ("init", "initialize"),
    ("ui", "interface"),
];

/// Language-specific vocabulary for generic terms.
const LANGUAGE_TERMS: &[(&str, &[(&str, &str)])] = &[
    (
        "python",
        &[
            ("function", "def"),
            ("error", "exception"),
            ("interface", "protocol"),
            ("dictionary", "dict"),
        ],
    ),
    (
        "javascript",
        &[
            ("dictionary", "object"),
            ("exception", "error"),
            ("async", "promise"),
        ],
    ),
    (
        "typescript",
        &[
            ("dictionary", "record"),
            ("exception", "error"),
            ("struct", "interface"),
        ],
    ),
    (
        "rust",
        &[
            ("interface", "trait"),
            ("class", "struct"),
            ("exception", "result"),
            ("null", "option"),
        ],
    ),
    (
        "go",
        &[
            ("class", "struct"),
            ("exception", "error"),
            ("thread", "goroutine"),
        ],
    ),
    (
        "java",
        &[
            ("function", "method"),
            ("dictionary", "map"),
            ("error", "exception"),
        ],
    ),
];

/// Framework-specific vocabulary.
const FRAMEWORK_TERMS: &[(&str, &[(&str, &str)])] = &[
    ("django", &[("endpoint", "view"), ("table", "model")]),
    ("flask", &[("endpoint", "route"), ("middleware", "before_request")]),
    ("fastapi", &[("endpoint", "path operation"), ("middleware", "dependency")]),
    ("express", &[("endpoint", "router"), ("handler", "middleware")]),
    ("react", &[("ui", "component"), ("state", "usestate"), ("lifecycle", "useeffect")]),
    ("spring", &[("endpoint", "controller"), ("service", "bean")]),
];

/// General synonyms used for semantic variants.
const SYNONYMS: &[(&str, &str)] = &[
    ("cache", "memoize"),
    ("caching", "memoization"),
    ("retry", "backoff"),
    ("error", "exception"),
    ("exception", "error"),
    ("function", "method"),
    ("method", "function"),
    ("create", "build"),
    ("build", "create"),
    ("fetch", "retrieve"),
    ("delete", "remove"),
    ("remove", "delete"),
    ("logic", "handling"),
    ("bug", "defect"),
    ("test", "spec"),
    ("settings", "configuration"),
    ("validate", "check"),
    ("parse", "decode"),
    ("login", "sign in"),
];

fn lookup<'a>(table: &'a [(&str, &'a str)], word: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(word))
        .map(|(_, to)| *to)
}

/// Replace every word found in `table`. Returns `None` if nothing changed.
fn substitute(text: &str, table: &[(&str, &str)]) -> Option<String> {
    let mut changed = false;
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| match lookup(table, w) {
            Some(to) if !to.eq_ignore_ascii_case(w) => {
                changed = true;
                to.to_string()
            }
            _ => w.to_string(),
        })
        .collect();
    changed.then(|| words.join(" "))
}

/// Expand known abbreviations.
pub fn expand_abbreviations(text: &str) -> Option<String> {
    substitute(text, ABBREVIATIONS)
}

/// Rewrite generic terms into a language's own vocabulary.
pub fn apply_language(text: &str, language: &str) -> Option<String> {
    LANGUAGE_TERMS
        .iter()
        .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
        .and_then(|(_, table)| substitute(text, table))
}

/// Rewrite generic terms into a framework's own vocabulary.
pub fn apply_framework(text: &str, framework: &str) -> Option<String> {
    FRAMEWORK_TERMS
        .iter()
        .find(|(fw, _)| fw.eq_ignore_ascii_case(framework))
        .and_then(|(_, table)| substitute(text, table))
}

/// Swap the first word that has a synonym.
pub fn swap_synonym(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let (idx, replacement) = words
        .iter()
        .enumerate()
        .find_map(|(i, w)| lookup(SYNONYMS, w).map(|to| (i, to)))?;
    let mut out: Vec<&str> = words.clone();
    out[idx] = replacement;
    Some(out.join(" "))
}
