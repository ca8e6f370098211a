//! Memoization wrapper
//!
//! Wraps an async function so repeated calls with the same arguments are served
//! from the cache.
//!
//! ```ignore
//! let price = memoize(
//!     Arc::clone(&cache),
//!     |(item, store): (String, String)| async move { scrape_price(&item, &store).await },
//!     |(item, store)| CacheKey::ingredient_price(item, store),
//!     None,
//! );
//! let cents: u32 = price.call(("flour".into(), "corner".into())).await?;
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use larder_domain::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::orchestrator::CacheOrchestrator;

/// A function whose results are cached under `key_fn(args)`
pub struct Memoized<A, V, F, K> {
    cache: Arc<CacheOrchestrator>,
    compute: F,
    key_fn: K,
    ttl: Option<Duration>,
    _signature: PhantomData<fn(A) -> V>,
}

/// Wrap `compute` so its results are cached; `ttl` of `None` uses the key's pattern
pub fn memoize<A, V, F, K>(
    cache: Arc<CacheOrchestrator>,
    compute: F,
    key_fn: K,
    ttl: Option<Duration>,
) -> Memoized<A, V, F, K>
where
    K: Fn(&A) -> String,
{
    Memoized {
        cache,
        compute,
        key_fn,
        ttl,
        _signature: PhantomData,
    }
}

impl<A, V, F, K> Memoized<A, V, F, K>
where
    V: Serialize + DeserializeOwned,
    K: Fn(&A) -> String,
{
    pub fn key_for(&self, args: &A) -> String {
        (self.key_fn)(args)
    }

    /// Cached result for `args`, computing it on a miss
    pub async fn call<Fut, E>(&self, args: A) -> std::result::Result<V, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<Error>,
    {
        let key = self.key_for(&args);
        let result = self
            .cache
            .get_or_compute(&key, self.ttl, || (self.compute)(args))
            .await?;
        Ok(result.value)
    }

    /// Drop the cached result for `args`
    pub async fn invalidate(&self, args: &A) -> Result<bool> {
        self.cache.delete(&self.key_for(args)).await
    }
}
