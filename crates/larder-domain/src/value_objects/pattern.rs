//! Namespace policies
//!
//! A pattern maps a key glob such as `recipe:*` to the TTL, compression and
//! invalidation links applied to every key it matches.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Policy for the keys matching `prefix`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePattern {
    /// Key glob, e.g. `recipe:*`
    pub prefix: String,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Compress serialized payloads above the size threshold
    #[serde(default)]
    pub compression: bool,
    /// Globs invalidated together with this one
    #[serde(default)]
    pub invalidation_links: BTreeSet<String>,
}

impl CachePattern {
    /// Create a pattern without compression or links
    ///
    /// `ttl` is rounded up to whole seconds; only a zero `ttl` yields zero.
    pub fn new<S: Into<String>>(prefix: S, ttl: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            ttl_secs: ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0)),
            compression: false,
            invalidation_links: BTreeSet::new(),
        }
    }

    /// Enable compression
    pub fn with_compression(mut self) -> Self {
        self.compression = true;
        self
    }

    /// Add an invalidation link
    pub fn with_link<S: Into<String>>(mut self, glob: S) -> Self {
        self.invalidation_links.insert(glob.into());
        self
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
