//! Provider layer constants

// ============================================================================
// REDIS CONSTANTS
// ============================================================================

/// Fallback Redis endpoint when the configuration carries no URI
pub const REDIS_DEFAULT_URI: &str = "redis://localhost:6379";

/// Minimum expiry accepted by `SET ... EX`
pub const REDIS_MIN_TTL_SECS: u64 = 1;

/// Minimum gap between connect attempts made on behalf of ordinary commands
pub const REDIS_RECONNECT_BACKOFF_MS: u64 = 1_000;

/// Registered provider name for Redis
pub const REDIS_PROVIDER_NAME: &str = "redis";

/// Registered provider name for the null backend
pub const NULL_PROVIDER_NAME: &str = "null";
