//! Infrastructure layer constants
//!
//! Tier and policy defaults live in `larder_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "larder.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "larder";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "LARDER";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Conventional environment variable naming the cold backend endpoint
pub const REDIS_URL_ENV: &str = "REDIS_URL";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "LARDER_LOG";

/// Default log file stem when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "larder";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Tier labels used in log fields
pub const TIER_HOT: &str = "hot";
pub const TIER_COLD: &str = "cold";

/// How long `shutdown()` waits for background tasks
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// METRICS CONSTANTS
// ============================================================================

pub const METRIC_HITS: &str = "larder_cache_hits_total";
pub const METRIC_MISSES: &str = "larder_cache_misses_total";
pub const METRIC_SETS: &str = "larder_cache_sets_total";
pub const METRIC_DELETES: &str = "larder_cache_deletes_total";
pub const METRIC_ERRORS: &str = "larder_cache_errors_total";
pub const METRIC_EVICTIONS: &str = "larder_cache_evictions_total";
pub const METRIC_AVG_LATENCY_US: &str = "larder_cache_avg_latency_us";
pub const METRIC_HIT_RATE: &str = "larder_cache_hit_rate";
pub const METRIC_HOT_ENTRIES: &str = "larder_cache_hot_entries";
pub const METRIC_COLD_CONNECTED: &str = "larder_cache_cold_connected";
