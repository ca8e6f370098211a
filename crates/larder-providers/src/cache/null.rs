//! Null cold store for testing
//!
//! Accepts every write, stores nothing and reports itself disconnected, so the
//! orchestrator runs memory-only.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use larder_domain::error::Result;
use larder_domain::ports::{COLD_STORE_PROVIDERS, ColdStoreProvider, ColdStoreProviderConfig, ColdStoreProviderEntry};

use crate::constants::NULL_PROVIDER_NAME;

/// Cold store that never holds anything
#[derive(Debug, Clone, Default)]
pub struct NullColdStore;

impl NullColdStore {
    /// Create a new null cold store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ColdStoreProvider for NullColdStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set_ex(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        Ok(vec![None; keys.len()])
    }

    async fn delete(&self, _keys: &[String]) -> Result<u64> {
        Ok(0)
    }

    async fn delete_matching(&self, _pattern: &str) -> Result<u64> {
        Ok(0)
    }

    async fn flush_all(&self) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        NULL_PROVIDER_NAME
    }
}

fn null_cold_store_factory(_config: &ColdStoreProviderConfig) -> Result<Arc<dyn ColdStoreProvider>> {
    Ok(Arc::new(NullColdStore::new()))
}

#[linkme::distributed_slice(COLD_STORE_PROVIDERS)]
static NULL_PROVIDER: ColdStoreProviderEntry = ColdStoreProviderEntry {
    name: NULL_PROVIDER_NAME,
    description: "No-op cold store (memory-only operation)",
    factory: null_cold_store_factory,
};
