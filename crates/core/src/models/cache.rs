use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// A cached value together with the moment it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
}

/// Read-through cache with a fixed freshness window.
///
/// An entry is fresh while `now - fetched_at < ttl`. Stale entries are kept
/// until overwritten or cleared, but `get_fresh` never returns them.
#[derive(Debug, Clone)]
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Build a cache from a window given in seconds.
    pub fn with_ttl_secs(secs: u64) -> Self {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1_000);
        Self::new(Duration::seconds(secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key` if it is still inside the freshness
    /// window at `now`.
    pub fn get_fresh(&self, key: &K, now: DateTime<Utc>) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| is_fresh(entry.fetched_at, now, self.ttl))
            .map(|entry| &entry.value)
    }

    /// Return the entry regardless of age.
    pub fn get_entry(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Insert or replace the value for `key`, stamped with `fetched_at`.
    pub fn insert(&mut self, key: K, value: V, fetched_at: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// A clock that moved backwards makes the age negative; such an entry is
// treated as fresh.
fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) < ttl
}
