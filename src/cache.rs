// 🗃️ Keyed Cache - remembers results per input
// Used by the CSV loader (no expiry) and the pet fetcher (10 minute expiry)

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

// ============================================================================
// CACHE ENTRY
// ============================================================================

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

// ============================================================================
// KEYED CACHE
// ============================================================================

/// Maps an input key to the value computed for it and the time it was stored.
///
/// With a `ttl`, an entry older than the ttl reads as missing, forcing the
/// caller to recompute. Without one, entries live as long as the cache.
#[derive(Debug, Clone)]
pub struct KeyedCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Option<Duration>,
}

impl<K: Eq + Hash, V: Clone> KeyedCache<K, V> {
    /// Cache whose entries never expire
    pub fn unbounded() -> Self {
        Self {
            entries: HashMap::new(),
            ttl: None,
        }
    }

    /// Cache whose entries expire `ttl` after being stored
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Fresh value for `key` as seen at `now`
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;

        if let Some(ttl) = self.ttl {
            if now - entry.stored_at > ttl {
                debug!(age_secs = (now - entry.stored_at).num_seconds(), "cache entry expired");
                return None;
            }
        }

        Some(entry.value.clone())
    }

    /// Store `value` for `key`; with a ttl, entries already stale at `now` are evicted
    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        if let Some(ttl) = self.ttl {
            let before = self.entries.len();
            self.entries.retain(|_, entry| now - entry.stored_at <= ttl);
            if self.entries.len() < before {
                debug!(evicted = before - self.entries.len(), "stale cache entries evicted");
            }
        }

        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    /// Drop every entry (used after a successful write)
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "cache cleared");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
