//! Cold tier failures, timeouts and cancellation degrade to misses

use std::sync::Arc;
use std::time::Duration;

use larder_domain::value_objects::ReadOptions;
use larder_infrastructure::cache::CacheOrchestrator;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::test_utils::{FailingColdStore, InMemoryColdStore, SlowColdStore};

#[tokio::test]
async fn test_failing_cold_tier_never_errors() {
    let cache = CacheOrchestrator::builder()
        .cold_store(Arc::new(FailingColdStore))
        .build()
        .unwrap();
    cache.start().await.unwrap();

    cache.set("recipe:1", &"soup", None).await.unwrap();
    let hot: Option<String> = cache.get("recipe:1").await.unwrap();
    assert_eq!(hot.as_deref(), Some("soup"));

    let cold_only: Option<String> = cache
        .get_with("recipe:1", &ReadOptions::new().skip_memory())
        .await
        .unwrap();
    assert_eq!(cold_only, None);
    assert!(cache.delete("recipe:1").await.unwrap());
    assert_eq!(cache.invalidate_pattern("recipe:*").await.unwrap().cold_removed, 0);
    cache.clear().await.unwrap();

    let metrics = cache.get_metrics();
    // ping, set, get, delete, invalidate, flush
    assert_eq!(metrics.errors, 6);
    assert!(!metrics.cold_connected);
    cache.shutdown().await;
}

#[tokio::test]
async fn test_recovers_when_cold_tier_returns() {
    let store = InMemoryColdStore::new();
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .build()
        .unwrap();

    store.set_failing(true);
    cache.set("price:a:milk", &99, None).await.unwrap();
    assert!(!store.contains_key("price:a:milk"));
    assert_eq!(cache.get_metrics().errors, 1);

    store.set_failing(false);
    cache.set("price:a:milk", &101, None).await.unwrap();
    assert!(store.contains_key("price:a:milk"));
    assert!(cache.get_metrics().cold_connected);
}

#[tokio::test]
async fn test_corrupt_payload_is_a_miss() {
    let store = InMemoryColdStore::new();
    store.insert_raw("recipe:9", b"{not json".to_vec());
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .build()
        .unwrap();

    assert_eq!(cache.get::<u32>("recipe:9").await.unwrap(), None);
    let metrics = cache.get_metrics();
    assert_eq!(metrics.errors, 1);
    assert_eq!(metrics.misses, 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_cold_tier_times_out() {
    let store = SlowColdStore::new(Duration::from_secs(10));
    store.inner.seed("recipe:1", json!(1), Duration::from_secs(60));
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .operation_timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    assert_eq!(cache.get::<u32>("recipe:1").await.unwrap(), None);
    assert_eq!(cache.get_metrics().errors, 1);

    let patient = ReadOptions::new().with_timeout(Duration::from_secs(30));
    assert_eq!(cache.get_with::<u32>("recipe:1", &patient).await.unwrap(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_slow_multi_get_times_out() {
    let store = SlowColdStore::new(Duration::from_secs(10));
    store.inner.seed("recipe:1", json!(1), Duration::from_secs(60));
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .build()
        .unwrap();

    let found = cache.get_multiple::<u32, _>(&["recipe:1"]).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(cache.get_metrics().errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_read_is_a_quiet_miss() {
    let store = SlowColdStore::new(Duration::from_secs(10));
    store.inner.seed("recipe:1", json!(1), Duration::from_secs(60));
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .operation_timeout(Duration::from_secs(60))
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let opts = ReadOptions::new().with_cancel(token);
    assert_eq!(cache.get_with::<u32>("recipe:1", &opts).await.unwrap(), None);

    let metrics = cache.get_metrics();
    assert_eq!(metrics.errors, 0);
    assert_eq!(metrics.misses, 1);
}

#[tokio::test]
async fn test_memory_only_without_cold_store() {
    let cache = CacheOrchestrator::builder().build().unwrap();
    cache.start().await.unwrap();

    assert_eq!(cache.get::<u32>("recipe:1").await.unwrap(), None);
    cache.set("recipe:1", &1, None).await.unwrap();
    assert_eq!(cache.get::<u32>("recipe:1").await.unwrap(), Some(1));
    assert_eq!(cache.get_metrics().errors, 0);
    cache.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_redis_does_not_stall_commands() {
    use larder_domain::ports::ColdStoreProviderConfig;
    use larder_providers::RedisColdStore;

    let config = ColdStoreProviderConfig::new("redis")
        .with_uri("redis://127.0.0.1:1")
        .with_connect_timeout(Duration::from_millis(200));
    let cache = CacheOrchestrator::builder()
        .cold_store(Arc::new(RedisColdStore::from_config(&config).unwrap()))
        .build()
        .unwrap();
    cache.start().await.unwrap();

    let started = std::time::Instant::now();
    for id in 0..4u32 {
        let key = format!("recipe:{id}");
        cache.set(&key, &id, None).await.unwrap();
        assert_eq!(cache.get::<u32>(&key).await.unwrap(), Some(id));
    }
    assert!(
        started.elapsed() < Duration::from_millis(400),
        "cache calls took {:?} with Redis down",
        started.elapsed()
    );

    let metrics = cache.get_metrics();
    assert!(metrics.errors >= 4);
    assert!(!metrics.cold_connected);
    cache.shutdown().await;
}
