//! Tests for the null cold store

use std::time::Duration;

use larder_domain::ports::ColdStoreProvider;
use larder_providers::cache::NullColdStore;

#[tokio::test]
async fn test_null_store_holds_nothing() {
    let store = NullColdStore::new();
    store
        .set_ex("recipe:1", b"payload", Duration::from_secs(60))
        .await
        .unwrap();

    assert!(store.get("recipe:1").await.unwrap().is_none());
    let keys = vec!["a".to_string(), "b".to_string()];
    assert_eq!(store.mget(&keys).await.unwrap(), vec![None, None]);
    assert_eq!(store.delete(&keys).await.unwrap(), 0);
    assert_eq!(store.delete_matching("*").await.unwrap(), 0);
    store.flush_all().await.unwrap();
    store.ping().await.unwrap();
}

#[tokio::test]
async fn test_null_store_is_never_connected() {
    let store = NullColdStore::new();
    assert!(!store.is_connected());
    store.close().await.unwrap();
    assert_eq!(store.provider_name(), "null");
}
