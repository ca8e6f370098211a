//! Cold Store Provider Implementations
//!
//! - **Development/Testing**: `NullColdStore` turns the cold tier into a no-op
//! - **Multi Instance**: `RedisColdStore` shares entries across processes

pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

pub use null::NullColdStore;
#[cfg(feature = "cache-redis")]
pub use redis::RedisColdStore;
