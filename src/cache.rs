use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;
use tracing::debug;

use crate::metrics::Metrics;

/// Default number of memoized entries, matching the day-keyed calendar cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Memoization seam injected into the calculators.
///
/// Implementations must tolerate concurrent readers. Writes are last-write-wins;
/// values stored for a key are always recomputable, so racing writers agree.
pub trait MemoCache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded memo cache. Once full, the oldest inserted key is evicted.
pub struct CalendarCache<K: Hash + Eq, V> {
    cache: RwLock<LruCache<K, V>>,
    metrics: Arc<Metrics>,
}

impl<K: Hash + Eq, V: Clone> CalendarCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self::with_metrics(capacity, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(capacity: usize, metrics: Arc<Metrics>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            metrics,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cache.read().cap().get()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.read().contains(key)
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl<K, V> Default for CalendarCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<K, V> MemoCache<K, V> for CalendarCache<K, V>
where
    K: Hash + Eq + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        // `peek` leaves recency untouched so eviction follows insertion order.
        let found = self.cache.read().peek(key).cloned();
        match found {
            Some(_) => self.metrics.record_cache_hit(),
            None => self.metrics.record_cache_miss(),
        }
        found
    }

    fn put(&self, key: K, value: V) {
        let mut cache = self.cache.write();
        let replacing = cache.contains(&key);
        if cache.push(key, value).is_some() && !replacing {
            debug!(target: "calendar_cache", capacity = cache.cap().get(), "evicted oldest entry");
        }
    }

    fn len(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_after_put() {
        let cache: CalendarCache<i32, String> = CalendarCache::new(4);
        assert!(cache.get(&1).is_none());

        cache.put(1, "one".to_string());
        assert_eq!(cache.get(&1).as_deref(), Some("one"));
        assert_eq!(cache.metrics().cache_hits(), 1);
        assert_eq!(cache.metrics().cache_misses(), 1);
    }

    #[test]
    fn test_evicts_oldest_inserted_key() {
        let cache: CalendarCache<i32, i32> = CalendarCache::new(3);
        for key in 0..3 {
            cache.put(key, key * 10);
        }
        // Reads must not refresh the oldest entry.
        assert_eq!(cache.get(&0), Some(0));

        cache.put(3, 30);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&0));
        assert!(cache.contains(&1));
        assert!(cache.contains(&3));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache: CalendarCache<i32, i32> = CalendarCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(2));
    }

    #[test]
    fn test_concurrent_writers_agree() {
        let cache: Arc<CalendarCache<u32, u32>> = Arc::new(CalendarCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for key in 0..16u32 {
                        cache.put(key, key * key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        for key in 0..16u32 {
            assert_eq!(cache.get(&key), Some(key * key));
        }
    }
}
