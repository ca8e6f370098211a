//! Glob and linked invalidation

use larder_domain::error::Error;
use larder_infrastructure::cache::CacheOrchestrator;

use crate::test_utils::InMemoryColdStore;

async fn populated() -> (CacheOrchestrator, std::sync::Arc<InMemoryColdStore>) {
    let store = InMemoryColdStore::new();
    let cache = CacheOrchestrator::builder()
        .cold_store(store.clone())
        .build()
        .unwrap();
    for key in [
        "recipe:1",
        "recipe:2",
        "recipe_search:abc",
        "nutrition:1",
        "meal_plan:u1:w1",
        "shopping_list:u1:p1",
        "user:u1:preferences",
        "price:shop:milk",
    ] {
        cache.set(key, &key, None).await.unwrap();
    }
    (cache, store)
}

async fn present(cache: &CacheOrchestrator, key: &str) -> bool {
    cache.get::<String>(key).await.unwrap().is_some()
}

#[tokio::test]
async fn test_recipe_scenario() {
    let cache = CacheOrchestrator::builder().build().unwrap();
    cache.set("recipe:42", &"lasagna", None).await.unwrap();
    assert!(present(&cache, "recipe:42").await);

    cache.invalidate_pattern("recipe:*").await.unwrap();
    assert!(!present(&cache, "recipe:42").await);
}

#[tokio::test]
async fn test_invalidate_pattern_is_scoped() {
    let (cache, store) = populated().await;

    let result = cache.invalidate_pattern("recipe:*").await.unwrap();
    assert_eq!(result.pattern, "recipe:*");
    assert_eq!(result.hot_removed, 2);
    assert_eq!(result.cold_removed, 2);

    assert!(!present(&cache, "recipe:1").await);
    assert!(!present(&cache, "recipe:2").await);
    assert!(!store.contains_key("recipe:1"));
    assert!(present(&cache, "recipe_search:abc").await);
    assert!(present(&cache, "nutrition:1").await);
    assert!(present(&cache, "price:shop:milk").await);
}

#[tokio::test]
async fn test_invalidate_linked_follows_links() {
    let (cache, store) = populated().await;

    let results = cache.invalidate_linked("recipe:*").await.unwrap();
    let patterns: Vec<&str> = results.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["recipe:*", "nutrition:*", "recipe_search:*"]);

    for key in ["recipe:1", "recipe_search:abc", "nutrition:1"] {
        assert!(!present(&cache, key).await, "{key} should be invalidated");
        assert!(!store.contains_key(key));
    }
    assert!(present(&cache, "meal_plan:u1:w1").await);
}

#[tokio::test]
async fn test_invalidate_linked_is_transitive() {
    let (cache, _store) = populated().await;

    let results = cache.invalidate_linked("user:*").await.unwrap();
    assert_eq!(results.len(), 3);

    assert!(!present(&cache, "user:u1:preferences").await);
    assert!(!present(&cache, "meal_plan:u1:w1").await);
    assert!(!present(&cache, "shopping_list:u1:p1").await);
    assert!(present(&cache, "recipe:1").await);
}

#[tokio::test]
async fn test_invalidate_linked_unregistered_glob() {
    let (cache, _store) = populated().await;

    let results = cache.invalidate_linked("price:shop:*").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].hot_removed, 1);
}

#[tokio::test]
async fn test_clear_empties_both_tiers() {
    let (cache, store) = populated().await;

    cache.clear().await.unwrap();
    assert_eq!(cache.get_metrics().hot_entries, 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_globs_both_tiers_cannot_share_are_rejected() {
    let (cache, store) = populated().await;

    for glob in ["recipe:{1,2}", "recipe:[!1]"] {
        let result = cache.invalidate_pattern(glob).await;
        assert!(matches!(result, Err(Error::InvalidKey { .. })), "{glob}");
    }
    assert!(present(&cache, "recipe:1").await);
    assert!(store.contains_key("recipe:2"));

    let result = cache.invalidate_pattern("recipe:[^1]").await.unwrap();
    assert_eq!(result.hot_removed, 1);
    assert_eq!(result.cold_removed, 1);
    assert!(present(&cache, "recipe:1").await);
    assert!(!present(&cache, "recipe:2").await);
}
