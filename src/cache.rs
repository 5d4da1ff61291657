//! Bounded in-memory cache with LRU eviction and idle expiry
//!
//! Holds process-local handles (such as hosted conversation threads) that
//! are cheap to rebuild. When the cache reaches capacity the
//! least-recently-used entry is evicted. Entries that go untouched for
//! longer than the TTL are no longer returned and are purged by the next
//! `put`, which hands every displaced entry back to the caller.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A capacity- and age-limited cache.
///
/// `get()` promotes the entry to most-recently-used and refreshes its age.
pub struct BoundedCache<K, V> {
    entries: Arc<RwLock<CacheInner<K, V>>>,
}

struct CacheInner<K, V> {
    map: HashMap<K, Slot<V>>,
    /// LRU order: front = oldest, back = newest
    order: VecDeque<K>,
    capacity: usize,
    ttl: Duration,
}

struct Slot<V> {
    value: V,
    touched: Instant,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries, each expiring
    /// after `ttl` without access. A zero capacity is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(CacheInner {
                map: HashMap::with_capacity(capacity.min(1024)),
                order: VecDeque::with_capacity(capacity.min(1024)),
                capacity,
                ttl,
            })),
        }
    }

    /// Insert or replace an entry.
    ///
    /// Returns the entries dropped by this call: expired ones first, then
    /// the LRU entry evicted to make room.
    pub async fn put(&self, key: K, value: V) -> Vec<(K, V)> {
        let mut inner = self.entries.write().await;
        let mut displaced = inner.purge_expired(Instant::now());

        let exists = inner.map.contains_key(&key);
        if exists {
            inner.order.retain(|k| *k != key);
        }

        if !exists && inner.map.len() >= inner.capacity {
            displaced.extend(inner.evict_lru());
        }

        inner.map.insert(
            key.clone(),
            Slot {
                value,
                touched: Instant::now(),
            },
        );
        inner.order.push_back(key);
        displaced
    }

    /// Fetch a live entry, promoting it to most-recently-used.
    ///
    /// An expired entry is left in place for the next `put` to purge.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.entries.write().await;
        let now = Instant::now();
        let ttl = inner.ttl;

        let slot = inner
            .map
            .get_mut(key)
            .filter(|slot| now.duration_since(slot.touched) <= ttl)?;
        slot.touched = now;
        let value = slot.value.clone();
        inner.order.retain(|k| k != key);
        inner.order.push_back(key.clone());
        Some(value)
    }

    /// Remove an entry
    pub async fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.entries.write().await;
        let slot = inner.map.remove(key)?;
        inner.order.retain(|k| k != key);
        Some(slot.value)
    }

    /// Number of entries, including any not yet purged as expired
    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.map.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.entries.read().await.capacity
    }
}

impl<K, V> CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let key = self.order.pop_front()?;
        let slot = self.map.remove(&key)?;
        Some((key, slot.value))
    }

    fn purge_expired(&mut self, now: Instant) -> Vec<(K, V)> {
        let ttl = self.ttl;
        let expired: Vec<K> = self
            .order
            .iter()
            .filter(|k| {
                self.map
                    .get(*k)
                    .is_some_and(|slot| now.duration_since(slot.touched) > ttl)
            })
            .cloned()
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }
        self.order.retain(|k| !expired.contains(k));
        expired
            .into_iter()
            .filter_map(|k| self.map.remove(&k).map(|slot| (k, slot.value)))
            .collect()
    }
}
