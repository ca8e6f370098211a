//! Cold Store Provider Port
//!
//! Port for the shared, networked key/value backend behind the cold tier. The
//! contract is byte-level: encoding, compression and expiry envelopes are the
//! cold tier adapter's concern, not the backend's.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Cold Store Provider Port
///
/// Every method may fail with a connection, timeout or serialization error; the
/// cold tier adapter absorbs those into misses and failed writes.
///
/// # Implementations
///
/// - **Redis**: shared backend over a multiplexed connection
/// - **Null**: no-op backend that never holds anything
#[async_trait]
pub trait ColdStoreProvider: Send + Sync + std::fmt::Debug {
    /// Fetch the raw payload stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Fetch several payloads in one round trip, in the order of `keys`
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Delete the given keys, returning how many existed
    async fn delete(&self, keys: &[String]) -> Result<u64>;

    /// Delete every key matching the glob `pattern`, returning how many existed
    async fn delete_matching(&self, pattern: &str) -> Result<u64>;

    /// Remove every key from the backend
    async fn flush_all(&self) -> Result<()>;

    /// Round-trip liveness check
    async fn ping(&self) -> Result<()>;

    /// Whether the provider currently holds a usable connection
    fn is_connected(&self) -> bool;

    /// Drop the connection; later calls fail with a connection error
    async fn close(&self) -> Result<()>;

    /// Registered provider name
    fn provider_name(&self) -> &str;
}
