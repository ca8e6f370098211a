//! Cache metrics snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the cache counters for the current window
///
/// # Example
///
/// ```ignore
/// let snapshot = cache.get_metrics();
/// println!("Hit rate: {:.1}%", snapshot.hit_rate * 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricsSnapshot {
    /// Reads served by either tier
    pub hits: u64,
    /// Reads that missed both tiers
    pub misses: u64,
    /// Successful writes
    pub sets: u64,
    /// Delete and invalidation calls
    pub deletes: u64,
    /// Tier failures absorbed as a miss or a failed write
    pub errors: u64,
    /// Hot tier entries dropped by capacity or the expiry sweep
    pub evictions: u64,
    /// Mean operation latency in microseconds
    pub avg_latency_us: f64,
    /// Hit rate (0.0 to 1.0)
    pub hit_rate: f64,
    /// Entries currently resident in the hot tier
    pub hot_entries: usize,
    /// Hot tier availability
    pub memory_connected: bool,
    /// Cold tier availability
    pub cold_connected: bool,
    /// Start of the current counting window
    pub window_started_at: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Calculate hit rate from hits and misses
    pub fn calculate_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}
