//! Cold tier adapter
//!
//! Wraps an optional [`ColdStoreProvider`] and turns every failure into a miss
//! or a failed write. Each call runs under a deadline (the caller's, else the
//! configured default) and can be cancelled through [`ReadOptions::cancel`].
//! Failures and timeouts are logged and counted; cancellations are not errors.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use larder_domain::error::Result;
use larder_domain::ports::ColdStoreProvider;
use larder_domain::value_objects::ReadOptions;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::codec::EnvelopeCodec;
use crate::cache::metrics::MetricsCollector;
use crate::constants::TIER_COLD;

/// Error-absorbing view of the shared backend
#[derive(Debug)]
pub struct ColdTier {
    store: Option<Arc<dyn ColdStoreProvider>>,
    codec: EnvelopeCodec,
    operation_timeout: Duration,
    metrics: Arc<MetricsCollector>,
}

impl ColdTier {
    pub fn new(
        store: Option<Arc<dyn ColdStoreProvider>>,
        codec: EnvelopeCodec,
        operation_timeout: Duration,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            store,
            codec,
            operation_timeout,
            metrics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.store.as_ref().is_some_and(|store| store.is_connected())
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.store.as_deref().map(|store| store.provider_name())
    }

    /// Run `fut` under the deadline and cancellation of `opts`
    async fn guard<T, F>(
        &self,
        op: &'static str,
        key: &str,
        opts: Option<&ReadOptions>,
        fut: F,
    ) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let deadline = opts
            .and_then(|o| o.timeout)
            .unwrap_or(self.operation_timeout);

        let outcome = match opts.and_then(|o| o.cancel.as_ref()) {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(tier = TIER_COLD, op, key, "Cold tier call cancelled");
                    return None;
                }
                outcome = tokio::time::timeout(deadline, fut) => outcome,
            },
            None => tokio::time::timeout(deadline, fut).await,
        };

        match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                warn!(tier = TIER_COLD, op, key, error = %error, "Cold tier operation failed");
                self.metrics.record_error();
                None
            }
            Err(_) => {
                warn!(
                    tier = TIER_COLD,
                    op,
                    key,
                    timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    "Cold tier operation timed out"
                );
                self.metrics.record_error();
                None
            }
        }
    }

    fn decode(&self, key: &str, bytes: &[u8]) -> Option<Value> {
        match self.codec.decode(bytes) {
            Ok(Some(entry)) => Some(entry.value),
            Ok(None) => {
                debug!(tier = TIER_COLD, key, "Discarding expired envelope");
                None
            }
            Err(error) => {
                warn!(tier = TIER_COLD, key, error = %error, "Cold tier payload could not be decoded");
                self.metrics.record_error();
                None
            }
        }
    }

    /// Check connectivity once; returns whether the backend answered
    pub async fn connect(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let connected = self.guard("PING", "", None, store.ping()).await.is_some();
        if connected {
            info!(tier = TIER_COLD, provider = store.provider_name(), "Cold tier connected");
        } else {
            warn!(
                tier = TIER_COLD,
                provider = store.provider_name(),
                "Cold tier unavailable, continuing memory-only"
            );
        }
        connected
    }

    pub async fn get(&self, key: &str, opts: &ReadOptions) -> Option<Value> {
        let store = self.store.as_ref()?;
        let bytes = self.guard("GET", key, Some(opts), store.get(key)).await??;
        self.decode(key, &bytes)
    }

    /// Presence check without decoding into the caller's type
    pub async fn contains(&self, key: &str, opts: &ReadOptions) -> bool {
        self.get(key, opts).await.is_some()
    }

    /// Fetch `keys` with a single multi-get, in order
    pub async fn get_many(&self, keys: &[String], opts: &ReadOptions) -> Vec<Option<Value>> {
        let mut values = vec![None; keys.len()];
        let Some(store) = &self.store else {
            return values;
        };
        if keys.is_empty() {
            return values;
        }

        let label = keys.first().map_or("", String::as_str);
        if let Some(payloads) = self.guard("MGET", label, Some(opts), store.mget(keys)).await {
            for ((slot, key), payload) in values.iter_mut().zip(keys).zip(payloads) {
                if let Some(bytes) = payload {
                    *slot = self.decode(key, &bytes);
                }
            }
        }
        values
    }

    /// Write `value`; returns whether the backend accepted it
    pub async fn set(&self, key: &str, value: &Value, ttl: Duration, compression: bool) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let payload = match self.codec.encode(value, ttl, compression) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(tier = TIER_COLD, key, error = %error, "Cold tier payload could not be encoded");
                self.metrics.record_error();
                return false;
            }
        };
        self.guard("SET", key, None, store.set_ex(key, &payload, ttl))
            .await
            .is_some()
    }

    pub async fn delete(&self, key: &str) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let keys = [key.to_string()];
        self.guard("DEL", key, None, store.delete(&keys))
            .await
            .is_some_and(|removed| removed > 0)
    }

    /// Delete every key matching `glob`; 0 on failure
    pub async fn delete_matching(&self, glob: &str) -> u64 {
        let Some(store) = &self.store else {
            return 0;
        };
        self.guard("KEYS+DEL", glob, None, store.delete_matching(glob))
            .await
            .unwrap_or(0)
    }

    pub async fn flush(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        self.guard("FLUSHDB", "", None, store.flush_all())
            .await
            .is_some()
    }

    pub async fn close(&self) {
        if let Some(store) = &self.store {
            if let Err(error) = store.close().await {
                warn!(tier = TIER_COLD, error = %error, "Failed to close cold tier");
            }
        }
    }
}
