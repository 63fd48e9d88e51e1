// ============================================================
// Layer 6 — Bounded LRU Cache
// ============================================================
// A fixed-capacity map that forgets its least-recently-used key
// when a new key arrives and the map is full.
//
//   get(k)     → a hit makes k the most recently used key
//   peek(k)    → looks without touching recency
//   insert(k)  → k becomes most recent; if the cache was full and k
//                is new, the least recently used key is evicted first
//
// Keys compare by value (Eq + Hash). Recency and eviction come from
// the `lru` crate; this wrapper adds hit/miss/eviction counters and
// reports the evicted entry on insert.

use lru::LruCache as Lru;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Hit/miss/eviction counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:      u64,
    pub misses:    u64,
    pub evictions: u64,
}

pub struct LruCache<K: Hash + Eq, V> {
    inner: Lru<K, V>,
    stats: CacheStats,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Lru::new(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize { self.inner.cap().get() }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    pub fn stats(&self) -> CacheStats { self.stats }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.inner.get(key) {
            Some(v) => {
                self.stats.hits += 1;
                Some(v)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up `key` without changing recency or counters.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.inner.peek(key)
    }

    /// Store `value` under `key`, returning the evicted entry if the
    /// insert pushed one out. Replacing an existing key evicts nothing.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.inner.contains(&key) {
            self.inner.put(key, value);
            return None;
        }

        let evicted = self.inner.push(key, value);
        if evicted.is_some() {
            self.stats.evictions += 1;
        }
        evicted
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
        self.inner.iter()
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().rev().map(|(k, _)| k)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K: Hash + Eq, V: Clone> LruCache<K, V> {
    /// Return the cached value for `key`, computing and storing it
    /// with `f` on a miss. A failed computation stores nothing.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: K,
        f:   impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(v) = self.get(&key) {
            return Ok(v.clone());
        }
        let value = f()?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
