//! Cache orchestrator
//!
//! Public facade over the hot and cold tiers. Reads check the hot tier, fall
//! through to the cold tier and promote cold hits; writes go to the hot tier
//! first and then to the cold tier. Tier failures degrade to misses and failed
//! writes; only malformed keys and use after shutdown reach the caller.
//!
//! # Example
//!
//! ```ignore
//! let cache = CacheOrchestrator::from_config(&config.cache)?;
//! cache.start().await?;
//!
//! cache.set(&CacheKey::recipe(42), &recipe, None).await?;
//! let cached: Option<Recipe> = cache.get(&CacheKey::recipe(42)).await?;
//!
//! cache.invalidate_pattern("recipe:*").await?;
//! cache.shutdown().await;
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use larder_domain::constants::{
    DEFAULT_COLD_OPERATION_TIMEOUT_MS, DEFAULT_COMPRESSION_THRESHOLD_BYTES, DEFAULT_HOT_CAPACITY,
    DEFAULT_METRICS_FLUSH_INTERVAL_SECS, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL,
};
use larder_domain::error::{Error, Result};
use larder_domain::keys::CacheKey;
use larder_domain::ports::{ColdStoreProvider, resolve_cold_store};
use larder_domain::value_objects::{CachePattern, MetricsSnapshot, ReadOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::cache::codec::EnvelopeCodec;
use crate::cache::cold::ColdTier;
use crate::cache::hot::HotTier;
use crate::cache::metrics::{MetricsCollector, TierStatus};
use crate::cache::patterns::{PatternRegistry, builtin_patterns, compile_glob};
use crate::config::CacheConfig;
use crate::constants::{SHUTDOWN_TIMEOUT_SECS, TIER_COLD, TIER_HOT};
use crate::infrastructure::ShutdownCoordinator;

/// Result of a cache-aside read
#[derive(Debug, Clone)]
pub struct CacheOperationResult<T> {
    /// The value, cached or freshly computed
    pub value: T,
    /// Whether the value came from the cache
    pub from_cache: bool,
    /// Time spent, computation included
    pub duration: Duration,
}

/// Outcome of one glob invalidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    /// The glob that was invalidated
    pub pattern: String,
    /// Entries removed from the hot tier
    pub hot_removed: usize,
    /// Keys the cold backend reported deleted
    pub cold_removed: u64,
}

/// Builder for [`CacheOrchestrator`]
#[derive(Debug)]
pub struct CacheOrchestratorBuilder {
    hot_capacity: usize,
    patterns: Vec<CachePattern>,
    default_ttl: Duration,
    compression_threshold: usize,
    cold_store: Option<Arc<dyn ColdStoreProvider>>,
    operation_timeout: Duration,
    sweep_interval: Duration,
    flush_interval: Duration,
}

impl Default for CacheOrchestratorBuilder {
    fn default() -> Self {
        Self {
            hot_capacity: DEFAULT_HOT_CAPACITY,
            patterns: builtin_patterns(),
            default_ttl: DEFAULT_TTL,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD_BYTES,
            cold_store: None,
            operation_timeout: Duration::from_millis(DEFAULT_COLD_OPERATION_TIMEOUT_MS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            flush_interval: Duration::from_secs(DEFAULT_METRICS_FLUSH_INTERVAL_SECS),
        }
    }
}

impl CacheOrchestratorBuilder {
    pub fn hot_capacity(mut self, capacity: usize) -> Self {
        self.hot_capacity = capacity;
        self
    }

    /// Replace the built-in pattern table
    pub fn patterns(mut self, patterns: Vec<CachePattern>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn compression_threshold(mut self, bytes: usize) -> Self {
        self.compression_threshold = bytes;
        self
    }

    /// Enable the cold tier over `store`
    pub fn cold_store(mut self, store: Arc<dyn ColdStoreProvider>) -> Self {
        self.cold_store = Some(store);
        self
    }

    /// Default deadline for cold tier calls
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn metrics_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn build(self) -> Result<CacheOrchestrator> {
        if self.sweep_interval.is_zero() || self.flush_interval.is_zero() {
            return Err(Error::configuration("Background task intervals cannot be 0"));
        }
        let patterns = PatternRegistry::new(self.patterns, self.default_ttl)?;
        let metrics = Arc::new(MetricsCollector::new());
        let cold = ColdTier::new(
            self.cold_store,
            EnvelopeCodec::new(self.compression_threshold),
            self.operation_timeout,
            Arc::clone(&metrics),
        );

        Ok(CacheOrchestrator {
            hot: Arc::new(HotTier::new(self.hot_capacity)),
            cold: Arc::new(cold),
            patterns,
            metrics,
            coordinator: ShutdownCoordinator::new(),
            sweep_interval: self.sweep_interval,
            flush_interval: self.flush_interval,
            started: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        })
    }
}

/// Multi-tier cache facade
#[derive(Debug)]
pub struct CacheOrchestrator {
    hot: Arc<HotTier<Value>>,
    cold: Arc<ColdTier>,
    patterns: PatternRegistry,
    metrics: Arc<MetricsCollector>,
    coordinator: ShutdownCoordinator,
    sweep_interval: Duration,
    flush_interval: Duration,
    started: AtomicBool,
    shut_down: AtomicBool,
}

impl CacheOrchestrator {
    pub fn builder() -> CacheOrchestratorBuilder {
        CacheOrchestratorBuilder::default()
    }

    /// Build from configuration; the cold tier is enabled when `cold.url` is set
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .hot_capacity(config.hot.capacity)
            .default_ttl(config.default_ttl())
            .compression_threshold(config.compression_threshold_bytes)
            .operation_timeout(config.cold.operation_timeout())
            .sweep_interval(config.hot.sweep_interval())
            .metrics_flush_interval(config.metrics_flush_interval());

        if let Some(patterns) = &config.patterns {
            builder = builder.patterns(patterns.clone());
        }

        if config.cold.is_enabled() {
            let store = resolve_cold_store(&config.cold.provider_config())?;
            info!(provider = store.provider_name(), "Cold tier enabled");
            builder = builder.cold_store(store);
        } else {
            info!("No cold tier endpoint configured, running memory-only");
        }

        builder.build()
    }

    fn ensure_running(&self) -> Result<()> {
        if self.shut_down.load(Ordering::Acquire) {
            Err(Error::ShutDown)
        } else {
            Ok(())
        }
    }

    pub fn is_running(&self) -> bool {
        !self.shut_down.load(Ordering::Acquire)
    }

    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start the expiry sweep and metrics flush, then check the cold tier
    ///
    /// Calling `start` again is a no-op.
    pub async fn start(&self) -> Result<()> {
        self.ensure_running()?;
        if self.started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let hot = Arc::clone(&self.hot);
        let metrics = Arc::clone(&self.metrics);
        self.spawn_periodic("hot-sweep", self.sweep_interval, move || {
            let purged = hot.purge_expired();
            if purged > 0 {
                metrics.record_evictions(purged as u64);
                debug!(tier = TIER_HOT, purged, "Expired entries swept");
            }
        });

        let hot = Arc::clone(&self.hot);
        let cold = Arc::clone(&self.cold);
        let metrics = Arc::clone(&self.metrics);
        self.spawn_periodic("metrics-flush", self.flush_interval, move || {
            metrics.flush(TierStatus {
                hot_entries: hot.len(),
                memory_connected: true,
                cold_connected: cold.is_connected(),
            });
        });

        if self.cold.is_enabled() {
            self.cold.connect().await;
        }
        info!(
            hot_capacity = self.hot.capacity(),
            patterns = self.patterns.len(),
            cold_provider = self.cold.provider_name(),
            "Cache started"
        );
        Ok(())
    }

    fn spawn_periodic<F>(&self, name: &'static str, period: Duration, task: F)
    where
        F: Fn() + Send + 'static,
    {
        self.coordinator.spawn_cancellable(name, move |token| async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => task(),
                }
            }
            debug!(task = name, "Background task stopped");
        });
    }

    /// Stop background tasks and close the cold tier; later calls are no-ops
    ///
    /// Every other operation fails with [`Error::ShutDown`] once this begins.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Shutting down cache");
        self.coordinator
            .shutdown(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
            .await;
        self.cold.close().await;
        info!("Cache shut down");
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_with(key, &ReadOptions::default()).await
    }

    /// Read `key` hot-then-cold under `opts`, promoting cold hits
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        key: &str,
        opts: &ReadOptions,
    ) -> Result<Option<T>> {
        self.ensure_running()?;
        CacheKey::validate(key)?;
        let started = Instant::now();

        let found = self.lookup(key, opts).await;
        if found.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        self.metrics.record_latency(started.elapsed());
        Ok(found)
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str, opts: &ReadOptions) -> Option<T> {
        if !opts.skip_memory {
            if let Some(value) = self.hot.get(key) {
                trace!(tier = TIER_HOT, key, "Cache hit");
                return self.decode(TIER_HOT, key, value);
            }
        }

        if opts.skip_cold || !self.cold.is_enabled() {
            return None;
        }
        let value = self.cold.get(key, opts).await?;
        let decoded = self.decode(TIER_COLD, key, value.clone())?;
        trace!(tier = TIER_COLD, key, "Cache hit");
        self.promote(key, value);
        Some(decoded)
    }

    /// A stored value that does not fit `T` reads as a miss
    fn decode<T: DeserializeOwned>(&self, tier: &'static str, key: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(tier, key, error = %error, "Cached value does not match the requested type");
                self.metrics.record_error();
                None
            }
        }
    }

    fn promote(&self, key: &str, value: Value) {
        let ttl = self.patterns.resolve_ttl(key);
        self.store_hot(key, value, ttl);
        debug!(key, ttl_secs = ttl.as_secs(), "Promoted cold hit");
    }

    fn store_hot(&self, key: &str, value: Value, ttl: Duration) {
        if let Some(evicted) = self.hot.set(key, value, ttl) {
            self.metrics.record_evictions(1);
            trace!(tier = TIER_HOT, key = %evicted, "Evicted oldest entry");
        }
    }

    /// Presence in either tier, without promotion
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.ensure_running()?;
        CacheKey::validate(key)?;
        if self.hot.contains(key) {
            return Ok(true);
        }
        Ok(self.cold.is_enabled() && self.cold.contains(key, &ReadOptions::default()).await)
    }

    /// Read many keys: hot tier first, then one multi-get for the rest
    pub async fn get_multiple<T, K>(&self, keys: &[K]) -> Result<HashMap<String, T>>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
    {
        self.ensure_running()?;
        for key in keys {
            CacheKey::validate(key.as_ref())?;
        }
        let started = Instant::now();

        let mut found = HashMap::new();
        let mut pending = Vec::new();
        let mut seen = HashSet::new();
        for key in keys.iter().map(AsRef::as_ref) {
            if !seen.insert(key) {
                continue;
            }
            match self.hot.get(key) {
                Some(value) => {
                    if let Some(decoded) = self.decode(TIER_HOT, key, value) {
                        found.insert(key.to_string(), decoded);
                    }
                }
                None => pending.push(key.to_string()),
            }
        }

        if !pending.is_empty() && self.cold.is_enabled() {
            let values = self
                .cold
                .get_many(&pending, &ReadOptions::default())
                .await;
            for (key, value) in pending.iter().zip(values) {
                let Some(value) = value else { continue };
                if let Some(decoded) = self.decode(TIER_COLD, key, value.clone()) {
                    self.promote(key, value);
                    found.insert(key.clone(), decoded);
                }
            }
        }

        let hits = found.len() as u64;
        self.metrics.record_lookups(hits, seen.len() as u64 - hits);
        self.metrics.record_latency(started.elapsed());
        Ok(found)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Store `value`; `ttl` of `None` or zero uses the key's pattern TTL
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.ensure_running()?;
        CacheKey::validate(key)?;
        let started = Instant::now();

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, error = %error, "Value could not be serialized, not cached");
                self.metrics.record_error();
                return Ok(());
            }
        };

        let policy = self.patterns.resolve(key);
        let ttl = ttl.filter(|ttl| !ttl.is_zero()).unwrap_or(policy.ttl);
        let cold_copy = self.cold.is_enabled().then(|| value.clone());

        self.store_hot(key, value, ttl);
        if let Some(value) = cold_copy {
            if !self.cold.set(key, &value, ttl, policy.compression).await {
                debug!(tier = TIER_COLD, key, "Cold write skipped, hot tier holds the value");
            }
        }

        self.metrics.record_set();
        self.metrics.record_latency(started.elapsed());
        Ok(())
    }

    /// Store every item independently; keys are validated before any write
    pub async fn set_multiple<T, K, I>(&self, items: I, ttl: Option<Duration>) -> Result<usize>
    where
        T: Serialize,
        K: AsRef<str>,
        I: IntoIterator<Item = (K, T)>,
    {
        self.ensure_running()?;
        let items: Vec<(K, T)> = items.into_iter().collect();
        for (key, _) in &items {
            CacheKey::validate(key.as_ref())?;
        }

        let writes = items
            .iter()
            .map(|(key, value)| self.set(key.as_ref(), value, ttl));
        futures::future::join_all(writes)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(items.len())
    }

    /// Bulk load entries with their pattern TTLs
    pub async fn warm_up<T, K, I>(&self, items: I) -> Result<usize>
    where
        T: Serialize,
        K: AsRef<str>,
        I: IntoIterator<Item = (K, T)>,
    {
        let started = Instant::now();
        let count = self.set_multiple(items, None).await?;
        info!(
            entries = count,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Cache warmed"
        );
        Ok(count)
    }

    /// Remove `key` from both tiers; returns whether either tier held it
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.ensure_running()?;
        CacheKey::validate(key)?;

        let in_hot = self.hot.delete(key);
        let in_cold = self.cold.is_enabled() && self.cold.delete(key).await;
        self.metrics.record_delete();
        Ok(in_hot || in_cold)
    }

    /// Remove every key matching `glob` from both tiers
    pub async fn invalidate_pattern(&self, glob: &str) -> Result<Invalidation> {
        self.ensure_running()?;
        let matcher = compile_glob(glob)?;

        let hot_removed = self.hot.remove_matching(&matcher);
        let cold_removed = if self.cold.is_enabled() {
            self.cold.delete_matching(glob).await
        } else {
            0
        };
        self.metrics.record_delete();
        info!(pattern = glob, hot_removed, cold_removed, "Pattern invalidated");

        Ok(Invalidation {
            pattern: glob.to_string(),
            hot_removed,
            cold_removed,
        })
    }

    /// Invalidate `glob` and, transitively, the links of its registered pattern
    ///
    /// Each glob is invalidated at most once, so cyclic links terminate.
    pub async fn invalidate_linked(&self, glob: &str) -> Result<Vec<Invalidation>> {
        self.ensure_running()?;
        compile_glob(glob)?;

        let mut visited = HashSet::from([glob.to_string()]);
        let mut queue = VecDeque::from([glob.to_string()]);
        let mut results = Vec::new();

        while let Some(next) = queue.pop_front() {
            results.push(self.invalidate_pattern(&next).await?);
            for link in self.patterns.links_for(&next).into_iter().flatten() {
                if visited.insert(link.clone()) {
                    queue.push_back(link.clone());
                }
            }
        }
        Ok(results)
    }

    /// Empty both tiers
    pub async fn clear(&self) -> Result<()> {
        self.ensure_running()?;
        let hot_removed = self.hot.clear();
        let cold_flushed = self.cold.is_enabled() && self.cold.flush().await;
        info!(hot_removed, cold_flushed, "Cache cleared");
        Ok(())
    }

    // ========================================================================
    // Cache-aside
    // ========================================================================

    /// Return the cached value or compute, store and return it
    ///
    /// After shutdown the computation still runs, uncached. A malformed key is
    /// returned as an error before anything is computed.
    pub async fn get_or_compute<T, F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> std::result::Result<CacheOperationResult<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<Error>,
    {
        let started = Instant::now();

        let cached = match self.get::<T>(key).await {
            Ok(cached) => cached,
            Err(Error::ShutDown) => {
                debug!(key, "Cache shut down, computing without caching");
                None
            }
            Err(error) => return Err(error.into()),
        };
        if let Some(value) = cached {
            return Ok(CacheOperationResult {
                value,
                from_cache: true,
                duration: started.elapsed(),
            });
        }

        let value = compute().await?;
        match self.set(key, &value, ttl).await {
            Ok(()) | Err(Error::ShutDown) => {}
            Err(error) => return Err(error.into()),
        }
        Ok(CacheOperationResult {
            value,
            from_cache: false,
            duration: started.elapsed(),
        })
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Point-in-time metrics, including tier connectivity
    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.tier_status())
    }

    /// Close the current metrics window now
    pub fn flush_metrics(&self) -> MetricsSnapshot {
        self.metrics.flush(self.tier_status())
    }

    fn tier_status(&self) -> TierStatus {
        TierStatus {
            hot_entries: self.hot.len(),
            memory_connected: self.is_running(),
            cold_connected: self.is_running() && self.cold.is_connected(),
        }
    }
}
