//! Configuration types

pub mod app;
pub mod cache;
pub mod logging;

pub use app::AppConfig;
pub use cache::{CacheConfig, ColdTierConfig, HotTierConfig};
pub use logging::LoggingConfig;
