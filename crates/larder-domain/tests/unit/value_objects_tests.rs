//! Unit tests for value objects

use std::time::Duration;

use larder_domain::value_objects::{CacheEntry, CachePattern, MetricsSnapshot, ReadOptions};
use tokio_util::sync::CancellationToken;

#[test]
fn test_entry_envelope_json_shape() {
    let entry = CacheEntry::new("payload".to_string(), Duration::from_secs(30), 7);
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["value"], "payload");
    assert_eq!(json["size_bytes"], 7);
    assert_eq!(json["compressed"], false);

    let mut without_flag = json.clone();
    without_flag.as_object_mut().unwrap().remove("compressed");
    let decoded: CacheEntry<String> = serde_json::from_value(without_flag).unwrap();
    assert!(!decoded.compressed);
    assert_eq!(decoded.expires_at, entry.expires_at);
}

#[test]
fn test_entry_remaining_ttl() {
    let entry = CacheEntry::new(1u8, Duration::from_secs(3600), 1);
    let remaining = entry.remaining_ttl().unwrap();
    assert!(remaining <= Duration::from_secs(3600));
    assert!(remaining > Duration::from_secs(3500));

    let expired = CacheEntry::new(1u8, Duration::ZERO, 1);
    assert!(expired.is_expired());
    assert!(expired.remaining_ttl().is_none());
}

#[test]
fn test_pattern_builder() {
    let pattern = CachePattern::new("recipe:*", Duration::from_secs(7200))
        .with_compression()
        .with_link("nutrition:*")
        .with_link("recipe_search:*")
        .with_link("nutrition:*");
    assert_eq!(pattern.ttl(), Duration::from_secs(7200));
    assert!(pattern.compression);
    assert_eq!(pattern.invalidation_links.len(), 2);
}

#[test]
fn test_pattern_ttl_rounds_up_to_whole_seconds() {
    assert_eq!(CachePattern::new("quote:*", Duration::from_millis(800)).ttl_secs, 1);
    assert_eq!(CachePattern::new("quote:*", Duration::from_millis(1200)).ttl_secs, 2);
    assert_eq!(CachePattern::new("quote:*", Duration::ZERO).ttl_secs, 0);
    assert_eq!(CachePattern::new("quote:*", Duration::MAX).ttl_secs, u64::MAX);
}

#[test]
fn test_pattern_deserializes_with_defaults() {
    let pattern: CachePattern =
        serde_json::from_str(r#"{"prefix":"price:*","ttl_secs":60}"#).unwrap();
    assert!(!pattern.compression);
    assert!(pattern.invalidation_links.is_empty());
}

#[test]
fn test_read_options() {
    let token = CancellationToken::new();
    let opts = ReadOptions::new()
        .skip_cold()
        .with_timeout(Duration::from_millis(10))
        .with_cancel(token.clone());
    assert!(opts.skip_cold);
    assert!(!opts.skip_memory);
    assert!(!opts.is_cancelled());
    token.cancel();
    assert!(opts.is_cancelled());
}

#[test]
fn test_hit_rate() {
    assert!((MetricsSnapshot::calculate_hit_rate(3, 1) - 0.75).abs() < f64::EPSILON);
    assert!(MetricsSnapshot::calculate_hit_rate(0, 0).abs() < f64::EPSILON);
}
