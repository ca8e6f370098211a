//! Cache entry envelope
//!
//! The cold tier stores a serialized `CacheEntry<String>`; the expiry travels with
//! the payload so a reader can reject an envelope the backend has not yet expired.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached value with its lifetime metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
    /// Serialized size of the value in bytes
    pub size_bytes: usize,
    /// Whether `value` holds a compressed payload
    #[serde(default)]
    pub compressed: bool,
}

impl<T> CacheEntry<T> {
    /// Create an entry written now that expires after `ttl`
    pub fn new(value: T, ttl: Duration, size_bytes: usize) -> Self {
        Self::created_at(value, Utc::now(), ttl, size_bytes)
    }

    /// Create an entry written at `created_at` that expires after `ttl`
    pub fn created_at(value: T, created_at: DateTime<Utc>, ttl: Duration, size_bytes: usize) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            value,
            created_at,
            expires_at,
            size_bytes,
            compressed: false,
        }
    }

    /// Mark the payload as compressed
    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, `None` once expired
    pub fn remaining_ttl(&self) -> Option<Duration> {
        (self.expires_at - Utc::now()).to_std().ok().filter(|d| !d.is_zero())
    }

    /// Replace the value, keeping the lifetime metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheEntry<U> {
        CacheEntry {
            value: f(self.value),
            created_at: self.created_at,
            expires_at: self.expires_at,
            size_bytes: self.size_bytes,
            compressed: self.compressed,
        }
    }
}
