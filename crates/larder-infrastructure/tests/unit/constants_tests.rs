//! Tests for infrastructure constants
#![allow(clippy::assertions_on_constants)]

use larder_infrastructure::constants::*;

#[test]
fn test_env_naming() {
    assert_eq!(CONFIG_ENV_PREFIX, "LARDER");
    assert_eq!(CONFIG_ENV_SEPARATOR, "__");
    assert!(LOG_FILTER_ENV.starts_with(CONFIG_ENV_PREFIX));
    assert!(DEFAULT_CONFIG_FILENAME.ends_with(".toml"));
}

#[test]
fn test_metric_names_share_prefix() {
    for name in [
        METRIC_HITS,
        METRIC_MISSES,
        METRIC_SETS,
        METRIC_DELETES,
        METRIC_ERRORS,
        METRIC_EVICTIONS,
        METRIC_AVG_LATENCY_US,
        METRIC_HIT_RATE,
        METRIC_HOT_ENTRIES,
        METRIC_COLD_CONNECTED,
    ] {
        assert!(name.starts_with("larder_cache_"), "{name}");
    }
}

#[test]
fn test_shutdown_timeout_reasonable() {
    assert!(SHUTDOWN_TIMEOUT_SECS >= 1);
    assert!(SHUTDOWN_TIMEOUT_SECS <= 30);
}
