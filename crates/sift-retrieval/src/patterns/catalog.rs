//! Built-in pattern catalog.

use std::sync::LazyLock;

use regex::Regex;
use sift_core::models::PatternType;

/// One named pattern with the evidence that identifies it.
pub struct PatternDefinition {
    pub name: &'static str,
    pub pattern_type: PatternType,
    pub keywords: &'static [&'static str],
    pub regexes: &'static [&'static LazyLock<Option<Regex>>],
}

macro_rules! structural {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

structural!(RE_SINGLETON_INSTANCE, r"(?i)(\bget_?instance\b|\b_instance\s*=|\bOnceCell\b|\bOnceLock\b|\blazy_static\b)");
structural!(RE_FACTORY_FN, r"(?i)\b(create|make|build)_?\w*\s*\(.*\)\s*(->|:)");
structural!(RE_FACTORY_CLASS, r"\b\w+Factory\b");
structural!(RE_OBSERVER_SUBSCRIBE, r"(?i)\b(subscribe|unsubscribe|add_?listener|notify_?(all|observers)?|on_event)\b");
structural!(RE_BUILDER_CHAIN, r"\.\s*with_\w+\([^)]*\)\s*\.|\bBuilder\b");
structural!(RE_STRATEGY_TRAIT, r"\b\w+Strategy\b");
structural!(RE_DECORATOR_AT, r"(?m)^\s*@\w+");
structural!(RE_ADAPTER_CLASS, r"\b\w+(Adapter|Wrapper)\b");
structural!(RE_REPOSITORY_CLASS, r"\b\w+(Repository|Repo|Dao|Store)\b");
structural!(RE_REPOSITORY_CRUD, r"(?i)\b(find_by_\w+|get_by_id|save|delete_by_id)\s*\(");
structural!(RE_DI_INJECT, r"(?i)(@inject|\binject\(|\bcontainer\.(get|resolve)\b|\bprovide[sr]?\b)");
structural!(RE_MIDDLEWARE_NEXT, r"(?i)(\bnext\s*\(|\bmiddleware\b|\bcall_next\b)");
structural!(RE_MVC_CONTROLLER, r"\b\w+(Controller|View|Model)\b");
structural!(RE_EVENT_EMIT, r"(?i)\b(emit|publish|dispatch)\s*\(");
structural!(RE_RETRY_LOOP, r"(?i)\b(retry|retries|retrying|max_attempts|max_retries|backoff)\b");
structural!(RE_CIRCUIT_STATE, r"(?i)\b(half[_-]?open|circuit[_\s]?breaker|CircuitState)\b");
structural!(RE_TRY_CATCH, r"(?i)(\btry\s*[:{]|\bcatch\s*\(|\bexcept\b|\?;|\bmap_err\b)");
structural!(RE_RESULT_TYPE, r"\bResult<|\bEither\b|\bOption<");
structural!(RE_FALLBACK_DEFAULT, r"(?i)\b(fallback|unwrap_or|or_else|default_value)\b");
structural!(RE_CACHE_LOOKUP, r"(?i)(\bcache\.(get|set|insert)\b|\blru_cache\b|@cache\b|\bmemoize\b|\bttl\b)");
structural!(RE_ASYNC_AWAIT, r"\b(async\s+(fn|def)|await)\b");
structural!(RE_LOCK, r"\b(Mutex|RwLock|Semaphore|synchronized)\b|\bLock\(\)");
structural!(RE_CHANNEL, r"(?i)(\bmpsc\b|\bchannel\(|\bqueue\(|\basyncio\.queue\b)");
structural!(RE_MOCK, r"(?i)(\b(mock|magicmock|stub|fake)\w*\b|\bpatch\()");
structural!(RE_FIXTURE, r"(?i)(@pytest\.fixture|\bfixture\b|beforeEach|setUp\s*\()");
structural!(RE_ASSERT, r"(?i)\b(assert\w*|expect\s*\()");

pub static CATALOG: &[PatternDefinition] = &[
    PatternDefinition {
        name: "singleton",
        pattern_type: PatternType::Design,
        keywords: &["singleton", "single instance", "global instance"],
        regexes: &[&RE_SINGLETON_INSTANCE],
    },
    PatternDefinition {
        name: "factory",
        pattern_type: PatternType::Design,
        keywords: &["factory", "create instance", "constructor function"],
        regexes: &[&RE_FACTORY_FN, &RE_FACTORY_CLASS],
    },
    PatternDefinition {
        name: "observer",
        pattern_type: PatternType::Design,
        keywords: &["observer", "subscribe", "listener", "notify", "pub sub", "pubsub"],
        regexes: &[&RE_OBSERVER_SUBSCRIBE],
    },
    PatternDefinition {
        name: "builder",
        pattern_type: PatternType::Design,
        keywords: &["builder", "fluent"],
        regexes: &[&RE_BUILDER_CHAIN],
    },
    PatternDefinition {
        name: "strategy",
        pattern_type: PatternType::Design,
        keywords: &["strategy", "pluggable", "interchangeable"],
        regexes: &[&RE_STRATEGY_TRAIT],
    },
    PatternDefinition {
        name: "decorator",
        pattern_type: PatternType::Design,
        keywords: &["decorator", "wrap function"],
        regexes: &[&RE_DECORATOR_AT],
    },
    PatternDefinition {
        name: "adapter",
        pattern_type: PatternType::Design,
        keywords: &["adapter", "wrapper", "shim"],
        regexes: &[&RE_ADAPTER_CLASS],
    },
    PatternDefinition {
        name: "repository",
        pattern_type: PatternType::Architectural,
        keywords: &["repository", "data access", "dao", "persistence"],
        regexes: &[&RE_REPOSITORY_CLASS, &RE_REPOSITORY_CRUD],
    },
    PatternDefinition {
        name: "dependency_injection",
        pattern_type: PatternType::Architectural,
        keywords: &["dependency injection", "inject", "container", "provider"],
        regexes: &[&RE_DI_INJECT],
    },
    PatternDefinition {
        name: "middleware",
        pattern_type: PatternType::Architectural,
        keywords: &["middleware", "interceptor", "pipeline"],
        regexes: &[&RE_MIDDLEWARE_NEXT],
    },
    PatternDefinition {
        name: "mvc",
        pattern_type: PatternType::Architectural,
        keywords: &["mvc", "controller", "model view"],
        regexes: &[&RE_MVC_CONTROLLER],
    },
    PatternDefinition {
        name: "event_driven",
        pattern_type: PatternType::Architectural,
        keywords: &["event driven", "event bus", "emit", "publish"],
        regexes: &[&RE_EVENT_EMIT],
    },
    PatternDefinition {
        name: "retry",
        pattern_type: PatternType::ErrorHandling,
        keywords: &["retry", "retries", "backoff", "exponential backoff"],
        regexes: &[&RE_RETRY_LOOP],
    },
    PatternDefinition {
        name: "circuit_breaker",
        pattern_type: PatternType::ErrorHandling,
        keywords: &["circuit breaker", "half open", "trip"],
        regexes: &[&RE_CIRCUIT_STATE],
    },
    PatternDefinition {
        name: "error_handling",
        pattern_type: PatternType::ErrorHandling,
        keywords: &["error handling", "exception", "try catch", "handle error"],
        regexes: &[&RE_TRY_CATCH, &RE_RESULT_TYPE],
    },
    PatternDefinition {
        name: "fallback",
        pattern_type: PatternType::ErrorHandling,
        keywords: &["fallback", "graceful degradation", "default value"],
        regexes: &[&RE_FALLBACK_DEFAULT],
    },
    PatternDefinition {
        name: "caching",
        pattern_type: PatternType::Architectural,
        keywords: &["cache", "caching", "memoize", "memoization", "lru"],
        regexes: &[&RE_CACHE_LOOKUP],
    },
    PatternDefinition {
        name: "async_await",
        pattern_type: PatternType::Concurrency,
        keywords: &["async", "await", "concurrent", "coroutine"],
        regexes: &[&RE_ASYNC_AWAIT],
    },
    PatternDefinition {
        name: "locking",
        pattern_type: PatternType::Concurrency,
        keywords: &["mutex", "lock", "semaphore", "thread safe"],
        regexes: &[&RE_LOCK],
    },
    PatternDefinition {
        name: "producer_consumer",
        pattern_type: PatternType::Concurrency,
        keywords: &["producer", "consumer", "queue", "channel"],
        regexes: &[&RE_CHANNEL],
    },
    PatternDefinition {
        name: "mocking",
        pattern_type: PatternType::Testing,
        keywords: &["mock", "stub", "fake", "spy"],
        regexes: &[&RE_MOCK],
    },
    PatternDefinition {
        name: "fixture",
        pattern_type: PatternType::Testing,
        keywords: &["fixture", "setup", "teardown"],
        regexes: &[&RE_FIXTURE],
    },
    PatternDefinition {
        name: "assertion",
        pattern_type: PatternType::Testing,
        keywords: &["assert", "expect", "verify"],
        regexes: &[&RE_ASSERT],
    },
];
