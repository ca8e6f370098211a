//! Cold Store Provider Registry
//!
//! Providers register themselves in [`COLD_STORE_PROVIDERS`] with
//! `#[linkme::distributed_slice]` and are resolved by name from configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COLD_CONNECT_TIMEOUT_MS, DEFAULT_COLD_PROVIDER, DEFAULT_COLD_RETRY_COUNT,
    DEFAULT_COLD_RETRY_DELAY_MS,
};
use crate::error::{Error, Result};
use crate::ports::cold_store::ColdStoreProvider;

/// Configuration for cold store provider creation
///
/// Providers use what they need and ignore the rest.
#[derive(Debug, Clone)]
pub struct ColdStoreProviderConfig {
    /// Provider name (e.g., "redis", "null")
    pub provider: String,
    /// Connection URI
    pub uri: Option<String>,
    /// Connection attempts after the first one fails
    pub retry_count: u32,
    /// Delay between connection attempts
    pub retry_delay: Duration,
    /// Issue a PING after connecting and treat failure as a failed attempt
    pub ready_check: bool,
    /// Deadline for a single connection attempt
    pub connect_timeout: Duration,
}

impl Default for ColdStoreProviderConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_COLD_PROVIDER.to_string(),
            uri: None,
            retry_count: DEFAULT_COLD_RETRY_COUNT,
            retry_delay: Duration::from_millis(DEFAULT_COLD_RETRY_DELAY_MS),
            ready_check: true,
            connect_timeout: Duration::from_millis(DEFAULT_COLD_CONNECT_TIMEOUT_MS),
        }
    }
}

impl ColdStoreProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }

    /// Enable or disable the post-connect ready check
    pub fn with_ready_check(mut self, ready_check: bool) -> Self {
        self.ready_check = ready_check;
        self
    }

    /// Set the per-attempt connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Registry entry for cold store providers
pub struct ColdStoreProviderEntry {
    /// Unique provider name (e.g., "redis", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&ColdStoreProviderConfig) -> Result<Arc<dyn ColdStoreProvider>>,
}

#[linkme::distributed_slice]
pub static COLD_STORE_PROVIDERS: [ColdStoreProviderEntry] = [..];

/// Resolve a cold store provider by name from the registry
///
/// # Returns
/// * `Ok(Arc<dyn ColdStoreProvider>)` - Created provider instance
/// * `Err(Error::Configuration)` - Unknown provider name or factory failure
pub fn resolve_cold_store(config: &ColdStoreProviderConfig) -> Result<Arc<dyn ColdStoreProvider>> {
    if let Some(entry) = COLD_STORE_PROVIDERS
        .iter()
        .find(|entry| entry.name == config.provider)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = COLD_STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(Error::configuration(format!(
        "Unknown cold store provider '{}'. Available providers: {:?}",
        config.provider, available
    )))
}

/// List all registered cold store providers as (name, description)
pub fn list_cold_stores() -> Vec<(&'static str, &'static str)> {
    COLD_STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
