//! Cache configuration types

use std::time::Duration;

use larder_domain::constants::{
    DEFAULT_COLD_CONNECT_TIMEOUT_MS, DEFAULT_COLD_OPERATION_TIMEOUT_MS, DEFAULT_COLD_PROVIDER,
    DEFAULT_COLD_RETRY_COUNT, DEFAULT_COLD_RETRY_DELAY_MS, DEFAULT_COMPRESSION_THRESHOLD_BYTES,
    DEFAULT_HOT_CAPACITY, DEFAULT_METRICS_FLUSH_INTERVAL_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TTL_SECS,
};
use larder_domain::ports::ColdStoreProviderConfig;
use larder_domain::value_objects::CachePattern;
use serde::{Deserialize, Serialize};

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for keys that match no pattern and carry no explicit TTL
    pub default_ttl_secs: u64,

    /// Payloads above this size are compressed when their pattern allows it
    pub compression_threshold_bytes: usize,

    /// Interval between metrics flushes
    pub metrics_flush_interval_secs: u64,

    /// Replacement for the built-in pattern table
    pub patterns: Option<Vec<CachePattern>>,

    /// Hot tier settings
    pub hot: HotTierConfig,

    /// Cold tier settings
    pub cold: ColdTierConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_TTL_SECS,
            compression_threshold_bytes: DEFAULT_COMPRESSION_THRESHOLD_BYTES,
            metrics_flush_interval_secs: DEFAULT_METRICS_FLUSH_INTERVAL_SECS,
            patterns: None,
            hot: HotTierConfig::default(),
            cold: ColdTierConfig::default(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn metrics_flush_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_flush_interval_secs)
    }
}

/// Hot tier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotTierConfig {
    /// Maximum number of resident entries
    pub capacity: usize,

    /// Interval between expiry sweeps
    pub sweep_interval_secs: u64,
}

impl Default for HotTierConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HOT_CAPACITY,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl HotTierConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Cold tier configuration
///
/// The cold tier is enabled only when `url` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColdTierConfig {
    /// Registered provider name
    pub provider: String,

    /// Backend endpoint
    pub url: Option<String>,

    /// Connection attempts after the first failure
    pub retry_count: u32,

    /// Delay between connection attempts
    pub retry_delay_ms: u64,

    /// PING after connecting
    pub ready_check: bool,

    /// Default deadline for each cold tier call
    pub operation_timeout_ms: u64,

    /// Deadline for a single connection attempt
    pub connect_timeout_ms: u64,
}

impl Default for ColdTierConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_COLD_PROVIDER.to_string(),
            url: None,
            retry_count: DEFAULT_COLD_RETRY_COUNT,
            retry_delay_ms: DEFAULT_COLD_RETRY_DELAY_MS,
            ready_check: true,
            operation_timeout_ms: DEFAULT_COLD_OPERATION_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_COLD_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ColdTierConfig {
    pub fn is_enabled(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Registry configuration for the provider factory
    pub fn provider_config(&self) -> ColdStoreProviderConfig {
        let mut config = ColdStoreProviderConfig::new(self.provider.clone())
            .with_retry(self.retry_count, Duration::from_millis(self.retry_delay_ms))
            .with_ready_check(self.ready_check)
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        if let Some(url) = &self.url {
            config = config.with_uri(url.clone());
        }
        config
    }
}
