//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`CacheEntry`] | A stored value with its creation and expiry timestamps |
//! | [`CachePattern`] | Namespace policy: TTL, compression, invalidation links |
//! | [`ReadOptions`] | Per-call tier selection, deadline and cancellation |
//! | [`MetricsSnapshot`] | Point-in-time copy of the cache counters |

/// Cache entry envelope
pub mod entry;
/// Cache metrics snapshot
pub mod metrics;
/// Read options
pub mod options;
/// Namespace policies
pub mod pattern;

pub use entry::CacheEntry;
pub use metrics::MetricsSnapshot;
pub use options::ReadOptions;
pub use pattern::CachePattern;
