//! Multi-tier cache
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`orchestrator`] | Public facade: tier coordination, promotion, invalidation, lifecycle |
//! | [`hot`] | Bounded in-process tier with FIFO eviction |
//! | [`cold`] | Error-absorbing adapter over the shared backend |
//! | [`codec`] | Cold tier envelope encoding and compression |
//! | [`patterns`] | Namespace policy registry |
//! | [`metrics`] | Counters and periodic flush |
//! | [`memoize`] | Memoization wrapper over `get_or_compute` |

pub mod codec;
pub mod cold;
pub mod hot;
pub mod memoize;
pub mod metrics;
pub mod orchestrator;
pub mod patterns;

pub use memoize::{Memoized, memoize};
pub use metrics::{MetricsCollector, TierStatus};
pub use orchestrator::{
    CacheOperationResult, CacheOrchestrator, CacheOrchestratorBuilder, Invalidation,
};
pub use patterns::{PatternRegistry, ResolvedPolicy};
