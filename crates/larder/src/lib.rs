//! # Larder
//!
//! A two-tier cache for a meal-planning backend: a bounded in-process hot tier
//! in front of a shared Redis cold tier, with namespace TTL policies, linked
//! invalidation and cache-aside helpers.
//!
//! ## Example
//!
//! ```ignore
//! use larder::{CacheKey, CacheOrchestrator};
//!
//! let cache = CacheOrchestrator::builder().build()?;
//! cache.start().await?;
//!
//! let key = CacheKey::recipe(42);
//! cache.set(&key, &recipe, None).await?;
//! let cached: Option<Recipe> = cache.get(&key).await?;
//!
//! cache.invalidate_linked("recipe:*").await?;
//! cache.shutdown().await;
//! ```
//!
//! ## Layout
//!
//! - `domain` - entries, keys, policies, errors and the cold store port
//! - `infrastructure` - tiers, orchestrator, config and logging
//! - `providers` - cold store backends (Redis, null)
//! - `cli` - the `larder` operator command

pub mod cli;

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use larder_domain::*;
}

/// Infrastructure layer - tiers, orchestration, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use larder_infrastructure::*;
}

/// Cold store providers
pub mod providers {
    pub use larder_providers::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the orchestrator and its helpers at the crate root
pub use infrastructure::cache::{CacheOperationResult, CacheOrchestrator, Memoized, memoize};
pub use infrastructure::config::{AppConfig, ConfigLoader};
