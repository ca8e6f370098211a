//! Hot tier: bounded in-process store
//!
//! Entries expire lazily: an expired entry reads as a miss but stays resident
//! until the next sweep or until capacity pushes it out. Capacity eviction is
//! insertion-ordered, so the entry written earliest goes first whatever its
//! access pattern; overwriting a key keeps its place in line.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use globset::GlobMatcher;
use tokio::time::Instant;

// Cap for TTLs too large to add to an Instant
const MAX_TTL: Duration = Duration::from_secs(30 * 365 * 24 * 3600);

#[derive(Debug)]
struct HotEntry<V> {
    value: V,
    expires_at: Instant,
    seq: u64,
}

impl<V> HotEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
struct HotState<V> {
    entries: HashMap<String, HotEntry<V>>,
    insertion_order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V> HotState<V> {
    fn remove(&mut self, key: &str) -> Option<HotEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.insertion_order.remove(&entry.seq);
        Some(entry)
    }
}

/// Bounded key/value store with per-entry expiry
#[derive(Debug)]
pub struct HotTier<V> {
    state: RwLock<HotState<V>>,
    capacity: usize,
}

impl<V: Clone> HotTier<V> {
    /// Create a tier holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(HotState {
                entries: HashMap::new(),
                insertion_order: BTreeMap::new(),
                next_seq: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HotState<V>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HotState<V>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live value for `key`; expired and absent entries are both `None`
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.read()
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.read()
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// Store `value` until `now + ttl`, returning the key evicted to make room
    pub fn set(&self, key: &str, value: V, ttl: Duration) -> Option<String> {
        let now = Instant::now();
        let expires_at = now + ttl.min(MAX_TTL);
        let mut state = self.write();

        if let Some(entry) = state.entries.get_mut(key) {
            entry.value = value;
            entry.expires_at = expires_at;
            return None;
        }

        let evicted = if state.entries.len() >= self.capacity {
            state.insertion_order.pop_first().map(|(_, oldest)| {
                state.entries.remove(&oldest);
                oldest
            })
        } else {
            None
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.insertion_order.insert(seq, key.to_string());
        state.entries.insert(
            key.to_string(),
            HotEntry {
                value,
                expires_at,
                seq,
            },
        );
        evicted
    }

    /// Remove `key`, returning whether a live entry was present
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        self.write()
            .remove(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// Remove every entry, returning how many were resident
    pub fn clear(&self) -> usize {
        let mut state = self.write();
        let removed = state.entries.len();
        state.entries.clear();
        state.insertion_order.clear();
        removed
    }

    /// Remove every resident key matching `glob`
    pub fn remove_matching(&self, glob: &GlobMatcher) -> usize {
        let mut state = self.write();
        let keys: Vec<String> = state
            .entries
            .keys()
            .filter(|key| glob.is_match(key.as_str()))
            .cloned()
            .collect();
        for key in &keys {
            state.remove(key);
        }
        keys.len()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.write();
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            state.remove(key);
        }
        expired.len()
    }

    /// Resident entries, expired ones included
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
