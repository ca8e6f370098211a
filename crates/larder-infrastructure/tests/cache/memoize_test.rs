//! Memoization wrapper

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use larder_domain::error::Error;
use larder_domain::keys::CacheKey;
use larder_infrastructure::cache::{CacheOrchestrator, memoize};

#[tokio::test]
async fn test_memoized_calls_compute_once_per_key() {
    let cache = Arc::new(CacheOrchestrator::builder().build().unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let price = memoize(
        Arc::clone(&cache),
        move |(item, _store): (String, String)| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, Error>(u32::try_from(item.len()).unwrap() * 100)
            }
        },
        |(item, store): &(String, String)| CacheKey::ingredient_price(item, store),
        None,
    );

    let args = ("flour".to_string(), "Corner Shop".to_string());
    assert_eq!(price.call(args.clone()).await.unwrap(), 500);
    assert_eq!(price.call(args.clone()).await.unwrap(), 500);
    assert_eq!(price.call(("rice".into(), "Corner Shop".into())).await.unwrap(), 400);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert_eq!(price.key_for(&args), "price:corner-shop:flour");
    assert!(price.invalidate(&args).await.unwrap());
    assert_eq!(price.call(args).await.unwrap(), 500);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
