//! Cache metrics collector
//!
//! Lock-free counters for one reporting window. `flush` publishes the window
//! through the `metrics` facade, logs it, and starts a new window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use larder_domain::value_objects::MetricsSnapshot;
use tracing::info;

use crate::constants::{
    METRIC_AVG_LATENCY_US, METRIC_COLD_CONNECTED, METRIC_DELETES, METRIC_ERRORS,
    METRIC_EVICTIONS, METRIC_HIT_RATE, METRIC_HITS, METRIC_HOT_ENTRIES, METRIC_MISSES,
    METRIC_SETS,
};

/// Tier state sampled alongside the counters
#[derive(Debug, Clone, Copy, Default)]
pub struct TierStatus {
    pub hot_entries: usize,
    pub memory_connected: bool,
    pub cold_connected: bool,
}

#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    sets: u64,
    deletes: u64,
    errors: u64,
    evictions: u64,
    latency_sum_us: u64,
    latency_count: u64,
}

/// Process-wide counters owned by the orchestrator
#[derive(Debug)]
pub struct MetricsCollector {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
    evictions: AtomicU64,
    latency_sum_us: AtomicU64,
    latency_count: AtomicU64,
    window_started_at: Mutex<DateTime<Utc>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            window_started_at: Mutex::new(Utc::now()),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch read
    pub fn record_lookups(&self, hits: u64, misses: u64) {
        self.hits.fetch_add(hits, Ordering::Relaxed);
        self.misses.fetch_add(misses, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        if count > 0 {
            self.evictions.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Add one operation to the window's mean latency
    pub fn record_latency(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.latency_sum_us.fetch_add(micros, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    fn window_start(&self) -> DateTime<Utc> {
        *self
            .window_started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Point-in-time copy of the current window
    pub fn snapshot(&self, status: TierStatus) -> MetricsSnapshot {
        let counters = Counters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            latency_sum_us: self.latency_sum_us.load(Ordering::Relaxed),
            latency_count: self.latency_count.load(Ordering::Relaxed),
        };
        build_snapshot(&counters, status, self.window_start())
    }

    /// Close the window: log and publish its counters, then reset them
    pub fn flush(&self, status: TierStatus) -> MetricsSnapshot {
        let started_at = {
            let mut window = self
                .window_started_at
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *window, Utc::now())
        };
        let counters = Counters {
            hits: self.hits.swap(0, Ordering::Relaxed),
            misses: self.misses.swap(0, Ordering::Relaxed),
            sets: self.sets.swap(0, Ordering::Relaxed),
            deletes: self.deletes.swap(0, Ordering::Relaxed),
            errors: self.errors.swap(0, Ordering::Relaxed),
            evictions: self.evictions.swap(0, Ordering::Relaxed),
            latency_sum_us: self.latency_sum_us.swap(0, Ordering::Relaxed),
            latency_count: self.latency_count.swap(0, Ordering::Relaxed),
        };
        let snapshot = build_snapshot(&counters, status, started_at);

        info!(
            hits = snapshot.hits,
            misses = snapshot.misses,
            sets = snapshot.sets,
            deletes = snapshot.deletes,
            errors = snapshot.errors,
            evictions = snapshot.evictions,
            hit_rate = snapshot.hit_rate,
            avg_latency_us = snapshot.avg_latency_us,
            hot_entries = snapshot.hot_entries,
            cold_connected = snapshot.cold_connected,
            "Cache metrics"
        );
        publish(&snapshot);
        snapshot
    }
}

fn build_snapshot(
    counters: &Counters,
    status: TierStatus,
    window_started_at: DateTime<Utc>,
) -> MetricsSnapshot {
    let avg_latency_us = if counters.latency_count > 0 {
        counters.latency_sum_us as f64 / counters.latency_count as f64
    } else {
        0.0
    };
    MetricsSnapshot {
        hits: counters.hits,
        misses: counters.misses,
        sets: counters.sets,
        deletes: counters.deletes,
        errors: counters.errors,
        evictions: counters.evictions,
        avg_latency_us,
        hit_rate: MetricsSnapshot::calculate_hit_rate(counters.hits, counters.misses),
        hot_entries: status.hot_entries,
        memory_connected: status.memory_connected,
        cold_connected: status.cold_connected,
        window_started_at: Some(window_started_at),
    }
}

fn publish(snapshot: &MetricsSnapshot) {
    metrics::counter!(METRIC_HITS).increment(snapshot.hits);
    metrics::counter!(METRIC_MISSES).increment(snapshot.misses);
    metrics::counter!(METRIC_SETS).increment(snapshot.sets);
    metrics::counter!(METRIC_DELETES).increment(snapshot.deletes);
    metrics::counter!(METRIC_ERRORS).increment(snapshot.errors);
    metrics::counter!(METRIC_EVICTIONS).increment(snapshot.evictions);
    metrics::gauge!(METRIC_AVG_LATENCY_US).set(snapshot.avg_latency_us);
    metrics::gauge!(METRIC_HIT_RATE).set(snapshot.hit_rate);
    metrics::gauge!(METRIC_HOT_ENTRIES).set(snapshot.hot_entries as f64);
    metrics::gauge!(METRIC_COLD_CONNECTED).set(f64::from(u8::from(snapshot.cold_connected)));
}
