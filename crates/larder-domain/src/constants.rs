//! Domain layer constants
//!
//! Defaults shared by the tiers, the configuration layer and the providers.

use std::time::Duration;

// ============================================================================
// KEY CONSTANTS
// ============================================================================

/// Separator between the namespace and the identifier parts of a key
pub const KEY_SEPARATOR: char = ':';

/// Maximum accepted key length in characters
pub const MAX_KEY_LENGTH: usize = 250;

/// Number of digest bytes kept when hashing free-text key segments
pub const KEY_DIGEST_BYTES: usize = 16;

// ============================================================================
// POLICY CONSTANTS
// ============================================================================

/// Default TTL in seconds when neither the caller nor a pattern supplies one (15 minutes)
pub const DEFAULT_TTL_SECS: u64 = 900;

/// Default TTL as a `Duration`
pub const DEFAULT_TTL: Duration = Duration::from_secs(DEFAULT_TTL_SECS);

/// Serialized payloads larger than this are compressed when the pattern allows it
pub const DEFAULT_COMPRESSION_THRESHOLD_BYTES: usize = 1024;

// ============================================================================
// TIER CONSTANTS
// ============================================================================

/// Default hot tier capacity (entries)
pub const DEFAULT_HOT_CAPACITY: usize = 1000;

/// Default interval between expiry sweeps of the hot tier
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default interval between metrics flushes
pub const DEFAULT_METRICS_FLUSH_INTERVAL_SECS: u64 = 60;

/// Default per-operation deadline for cold tier calls
pub const DEFAULT_COLD_OPERATION_TIMEOUT_MS: u64 = 500;

/// Default connection attempt timeout for the cold backend
pub const DEFAULT_COLD_CONNECT_TIMEOUT_MS: u64 = 2000;

/// Default number of connection retries for the cold backend
pub const DEFAULT_COLD_RETRY_COUNT: u32 = 3;

/// Default delay between cold backend connection retries
pub const DEFAULT_COLD_RETRY_DELAY_MS: u64 = 200;

/// Default cold store provider name
pub const DEFAULT_COLD_PROVIDER: &str = "redis";
