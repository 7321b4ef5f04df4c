// Single source of truth for all default values.

// --- Retrieval ---
pub const DEFAULT_RESULT_LIMIT: usize = 10;
pub const DEFAULT_STAGE_TOP_N: usize = 50;
pub const DEFAULT_KEYWORD_VARIANTS: usize = 3;
pub const DEFAULT_SEMANTIC_CONFIG: &str = "default";
pub const DEFAULT_MAX_QUERY_VARIANTS: usize = 15;

// --- Fusion ---
pub const DEFAULT_RRF_K: f64 = 60.0;
pub const DEFAULT_STAGE_WEIGHTS: [f64; 5] = [1.0, 0.8, 0.6, 0.4, 0.3];
pub const DEFAULT_RRF_BLEND: f64 = 0.7;
pub const DEFAULT_SCORE_BLEND: f64 = 0.3;
pub const DEFAULT_FUSION_TOP_K: usize = 20;
pub const DEFAULT_PRUNING_BUDGET: usize = 3_500;
pub const DEFAULT_TOKENS_PER_DOCUMENT: usize = 200;
pub const DEFAULT_CONTEXT_BUDGET: usize = 3_000;
pub const DEFAULT_CONTEXT_SAFETY_MARGIN: usize = 200;

// --- Resilience ---
pub const DEFAULT_STAGE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2_000;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_COOLDOWN_MS: u64 = 30_000;
pub const DEFAULT_HALF_OPEN_SUCCESSES: u32 = 1;

// --- Document cache ---
pub const DEFAULT_DOCUMENT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_DOCUMENT_CACHE_TTL_SECS: u64 = 600; // 10 minutes

// --- Ranking ---
pub const DEFAULT_COMPLEXITY_CEILING: f64 = 50.0;
pub const DEFAULT_PROXIMITY_DAMPING: bool = true;

// --- Adaptive ---
pub const DEFAULT_ADAPTIVE_ENABLED: bool = false;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_MAX_ADJUSTMENT: f64 = 0.2;
pub const DEFAULT_MAX_STEP: f64 = 0.05;
pub const DEFAULT_RECALC_EVERY_QUERIES: u64 = 100;
pub const DEFAULT_RECALC_INTERVAL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_MIN_FEEDBACK: usize = 20;
pub const DEFAULT_FEEDBACK_CHANNEL_CAPACITY: usize = 256;
pub const DEFAULT_FEEDBACK_BUFFER_CAPACITY: usize = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_MONITOR_WINDOW: usize = 1_000;
