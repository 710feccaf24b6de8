//! Bounded, time-boxed memoization.
//!
//! Process-wide caches (upstream responses, geocoder lookups) must not grow
//! without limit. [`TtlCache`] expires entries after a fixed TTL, sweeping
//! lazily on the next access, and evicts the least recently used entry once
//! `max_entries` is exceeded.

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

/// Default maximum entries before LRU eviction.
const DEFAULT_MAX_ENTRIES: usize = 512;

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    max_entries: usize,
    /// Insertion order doubles as recency order (IndexMap).
    entries: IndexMap<K, CacheEntry<V>>,
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Look up `key` as of `now`, sweeping expired entries first.
    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        self.sweep(now);
        let index = self.entries.get_index_of(key)?;
        // Move to the back: most recently used.
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.sweep(now);
        self.entries.shift_remove(&key);
        self.entries.insert(
            key,
            CacheEntry {
                inserted_at: now,
                value,
            },
        );
        while self.entries.len() > self.max_entries {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn sweep(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) <= ttl);
    }
}

/// Stable cache key for a tuple of content parts (SHA-256, hex, 32 chars).
///
/// Each part is length-prefixed, so part boundaries are part of the key.
pub fn content_key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    digest[..32].to_string()
}
