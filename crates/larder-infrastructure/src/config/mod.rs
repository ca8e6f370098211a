//! Configuration
//!
//! Layered configuration built with Figment: defaults, then a TOML file, then
//! `REDIS_URL`, then `LARDER_*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, CacheConfig, ColdTierConfig, HotTierConfig, LoggingConfig};
