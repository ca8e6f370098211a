//! Redis cold store provider
//!
//! Shared cold tier backend over a single multiplexed connection.
//!
//! ## Features
//!
//! - Lazy connection with an optional PING ready check
//! - Connection slot reset on command failure, so the next call reconnects
//! - Reconnect backoff: while the server is down, commands fail immediately
//!   instead of each waiting out a connect attempt
//! - Bounded connect retries on `ping`, the startup connectivity check
//! - `KEYS` + `DEL` for glob invalidation
//!
//! ## Example
//!
//! ```ignore
//! use larder_providers::cache::RedisColdStore;
//!
//! let store = RedisColdStore::new("redis://localhost:6379")?;
//! store.set_ex("recipe:42", b"{}", Duration::from_secs(60)).await?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use larder_domain::error::{Error, Result};
use larder_domain::ports::{
    COLD_STORE_PROVIDERS, ColdStoreProvider, ColdStoreProviderConfig, ColdStoreProviderEntry,
};
use redis::{Client, aio::MultiplexedConnection};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::constants::{
    REDIS_DEFAULT_URI, REDIS_MIN_TTL_SECS, REDIS_PROVIDER_NAME, REDIS_RECONNECT_BACKOFF_MS,
};

/// Redis cold store provider
pub struct RedisColdStore {
    client: Client,
    address: String,
    connection: ArcSwapOption<MultiplexedConnection>,
    closed: AtomicBool,
    retry_count: u32,
    retry_delay: Duration,
    ready_check: bool,
    connect_timeout: Duration,
    reconnect_backoff: Duration,
    /// Start of the most recent failed or in-flight connect attempt
    last_attempt: Mutex<Option<Instant>>,
}

impl RedisColdStore {
    /// Create a provider for `uri` with default retry settings
    ///
    /// No connection is opened until the first command.
    pub fn new(uri: &str) -> Result<Self> {
        Self::from_config(&ColdStoreProviderConfig::new(REDIS_PROVIDER_NAME).with_uri(uri))
    }

    /// Create a provider from registry configuration
    pub fn from_config(config: &ColdStoreProviderConfig) -> Result<Self> {
        let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URI);
        let client = Client::open(uri).map_err(|e| {
            Error::configuration_with_source(format!("Invalid Redis URL: {e}"), e)
        })?;

        Ok(Self {
            client,
            address: redact_credentials(uri),
            connection: ArcSwapOption::empty(),
            closed: AtomicBool::new(false),
            retry_count: config.retry_count,
            retry_delay: config.retry_delay,
            ready_check: config.ready_check,
            connect_timeout: config.connect_timeout,
            reconnect_backoff: Duration::from_millis(REDIS_RECONNECT_BACKOFF_MS),
            last_attempt: Mutex::new(None),
        })
    }

    /// Endpoint with any credentials masked
    pub fn server_address(&self) -> &str {
        &self.address
    }

    /// Current connection, establishing one if the slot is empty
    ///
    /// Makes a single connect attempt, and none at all while the previous
    /// attempt is younger than the reconnect backoff.
    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.current()? {
            return Ok(conn);
        }
        self.begin_attempt()?;
        let conn = self.try_connect().await.inspect_err(|e| {
            warn!(address = %self.address, error = %e, "Redis reconnect failed");
        })?;
        self.install(conn)
    }

    /// Connect ignoring the backoff, retrying up to `retry_count` times
    async fn connect_with_retry(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.current()? {
            return Ok(conn);
        }
        let attempts = self.retry_count.saturating_add(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            self.mark_attempt();
            match self.try_connect().await {
                Ok(conn) => {
                    info!(address = %self.address, attempt, "Connected to Redis");
                    return self.install(conn);
                }
                Err(e) => {
                    warn!(address = %self.address, attempt, error = %e, "Redis connection attempt failed");
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::connection("Redis connection failed")))
    }

    fn current(&self) -> Result<Option<MultiplexedConnection>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::connection("Redis cold store is closed"));
        }
        Ok(self.connection.load_full().map(|conn| (*conn).clone()))
    }

    /// Claim the next connect attempt, or fail while backing off
    ///
    /// The attempt is recorded before connecting, so a caller whose deadline
    /// cancels the connect still holds off the callers behind it.
    fn begin_attempt(&self) -> Result<()> {
        let mut last = self.last_attempt.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.reconnect_backoff {
                let wait = self.reconnect_backoff - elapsed;
                return Err(Error::connection(format!(
                    "Redis at {} unavailable, reconnect backing off for {}ms",
                    self.address,
                    wait.as_millis()
                )));
            }
        }
        *last = Some(Instant::now());
        Ok(())
    }

    fn mark_attempt(&self) {
        *self.last_attempt.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    fn install(&self, conn: MultiplexedConnection) -> Result<MultiplexedConnection> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::connection("Redis cold store is closed"));
        }
        *self.last_attempt.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.connection.store(Some(Arc::new(conn.clone())));
        Ok(conn)
    }

    async fn try_connect(&self) -> Result<MultiplexedConnection> {
        let mut conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| Error::timeout(format!("Redis connect to {}", self.address)))?
        .map_err(|e| {
            Error::connection_with_source(format!("Failed to get Redis connection: {e}"), e)
        })?;

        if self.ready_check {
            redis::cmd("PING")
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| {
                    Error::connection_with_source(format!("Redis ready check failed: {e}"), e)
                })?;
        }

        Ok(conn)
    }

    /// Map a command failure and drop the connection so the next call reconnects
    fn command_error(&self, command: &str, e: redis::RedisError) -> Error {
        debug!(command, error = %e, "Resetting Redis connection after command failure");
        self.connection.store(None);
        Error::connection_with_source(format!("Redis {command} failed: {e}"), e)
    }
}

/// `SET ... EX` takes whole seconds; round up and never send zero
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(REDIS_MIN_TTL_SECS)
}

fn redact_credentials(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &uri[..scheme_end], &uri[at..])
        }
        _ => uri.to_string(),
    }
}

#[async_trait]
impl ColdStoreProvider for RedisColdStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        redis::cmd("GET")
            .arg(key)
            .query_async::<Option<Vec<u8>>>(&mut conn)
            .await
            .map_err(|e| self.command_error("GET", e))
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| self.command_error("SET", e))
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection().await?;
        redis::cmd("MGET")
            .arg(keys)
            .query_async::<Vec<Option<Vec<u8>>>>(&mut conn)
            .await
            .map_err(|e| self.command_error("MGET", e))
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(keys)
            .query_async::<u64>(&mut conn)
            .await
            .map_err(|e| self.command_error("DEL", e))
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.command_error("KEYS", e))?;
        if keys.is_empty() {
            return Ok(0);
        }
        redis::cmd("DEL")
            .arg(&keys)
            .query_async::<u64>(&mut conn)
            .await
            .map_err(|e| self.command_error("DEL", e))
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| self.command_error("FLUSHDB", e))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connect_with_retry().await?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| self.command_error("PING", e))
    }

    fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::Acquire) && self.connection.load().is_some()
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.connection.store(None);
        info!(address = %self.address, "Redis cold store closed");
        Ok(())
    }

    fn provider_name(&self) -> &str {
        REDIS_PROVIDER_NAME
    }
}

impl std::fmt::Debug for RedisColdStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisColdStore")
            .field("server", &self.address)
            .field("connected", &self.is_connected())
            .field("retry_count", &self.retry_count)
            .field("reconnect_backoff", &self.reconnect_backoff)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn redis_cold_store_factory(config: &ColdStoreProviderConfig) -> Result<Arc<dyn ColdStoreProvider>> {
    Ok(Arc::new(RedisColdStore::from_config(config)?))
}

#[linkme::distributed_slice(COLD_STORE_PROVIDERS)]
static REDIS_PROVIDER: ColdStoreProviderEntry = ColdStoreProviderEntry {
    name: REDIS_PROVIDER_NAME,
    description: "Redis shared cold store",
    factory: redis_cold_store_factory,
};
