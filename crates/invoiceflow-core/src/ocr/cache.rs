//! Bounded least-recently-used cache of backend instances.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::{CapabilityType, OcrBackend};

pub const DEFAULT_CACHE_CAPACITY: usize = 4;

/// LRU cache keyed by capability type.
///
/// Entries are ordered from least to most recently used. Lookup, touch,
/// construction and eviction for one request happen under a single lock, so
/// concurrent requests for the same key construct at most one instance and
/// the number of cached entries never exceeds the capacity.
///
/// Values are shared through [`Arc`]: evicting an entry only drops the
/// cache's reference, callers holding a handle keep a working instance.
pub struct ExtractorCache<K = CapabilityType, V: ?Sized = dyn OcrBackend> {
    capacity: usize,
    entries: Mutex<Vec<(K, Arc<V>)>>,
}

impl<K, V: ?Sized> ExtractorCache<K, V>
where
    K: Copy + Eq + Debug,
{
    /// Create a cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `key` is cached. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().iter().any(|(k, _)| k == key)
    }

    /// Cached keys, least recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.lock().iter().map(|(k, _)| *k).collect()
    }

    /// Return the cached value for `key` and mark it most recently used.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut entries = self.lock();
        Self::touch(&mut entries, key)
    }

    /// Return the cached value for `key`, constructing it with `create` on a
    /// miss. A failed construction leaves the cache unchanged.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, create: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
    {
        let mut entries = self.lock();

        if let Some(value) = Self::touch(&mut entries, &key) {
            debug!("Cache hit for {:?}", key);
            return Ok(value);
        }

        info!("Cache miss for {:?}, constructing", key);
        let value = create()?;

        if entries.len() >= self.capacity {
            let (evicted, _) = entries.remove(0);
            warn!("Evicted least recently used entry {:?}", evicted);
        }
        entries.push((key, Arc::clone(&value)));

        Ok(value)
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        if !entries.is_empty() {
            info!("Clearing {} cached entries", entries.len());
        }
        entries.clear();
    }

    fn touch(entries: &mut Vec<(K, Arc<V>)>, key: &K) -> Option<Arc<V>> {
        let index = entries.iter().position(|(k, _)| k == key)?;
        let entry = entries.remove(index);
        let value = Arc::clone(&entry.1);
        entries.push(entry);
        Some(value)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(K, Arc<V>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V: ?Sized> Default for ExtractorCache<K, V>
where
    K: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<K: Debug, V: ?Sized> Debug for ExtractorCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let keys: Vec<&K> = entries.iter().map(|(k, _)| k).collect();
        f.debug_struct("ExtractorCache")
            .field("capacity", &self.capacity)
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    type Cache = ExtractorCache<u32, String>;

    fn build(key: u32) -> Result<Arc<String>, ()> {
        Ok(Arc::new(format!("instance-{}", key)))
    }

    #[test]
    fn test_hit_returns_same_instance() {
        let cache = Cache::new(4);
        let first = cache.get_or_try_insert_with(1, || build(1)).unwrap();
        let second = cache
            .get_or_try_insert_with(1, || -> Result<Arc<String>, ()> { panic!("constructed twice") })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = Cache::new(4);
        for key in 1..=5 {
            cache.get_or_try_insert_with(key, || build(key)).unwrap();
        }

        assert_eq!(cache.len(), 4);
        assert!(!cache.contains(&1));
        assert_eq!(cache.keys(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_hit_refreshes_recency() {
        let cache = Cache::new(2);
        cache.get_or_try_insert_with(1, || build(1)).unwrap();
        cache.get_or_try_insert_with(2, || build(2)).unwrap();
        cache.get_or_try_insert_with(1, || build(1)).unwrap();
        cache.get_or_try_insert_with(3, || build(3)).unwrap();

        assert_eq!(cache.keys(), vec![1, 3]);
    }

    #[test]
    fn test_evicted_handle_stays_usable() {
        let cache = Cache::new(1);
        let held = cache.get_or_try_insert_with(1, || build(1)).unwrap();
        cache.get_or_try_insert_with(2, || build(2)).unwrap();

        assert!(!cache.contains(&1));
        assert_eq!(held.as_str(), "instance-1");
    }

    #[test]
    fn test_failed_construction_leaves_cache_unchanged() {
        let cache = Cache::new(2);
        cache.get_or_try_insert_with(1, || build(1)).unwrap();

        let result = cache.get_or_try_insert_with(2, || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(cache.keys(), vec![1]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = Cache::new(0);
        cache.get_or_try_insert_with(1, || build(1)).unwrap();
        cache.get_or_try_insert_with(2, || build(2)).unwrap();

        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.keys(), vec![2]);
    }

    #[test]
    fn test_clear_then_rebuild() {
        let cache = Cache::new(4);
        let before = cache.get_or_try_insert_with(1, || build(1)).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        let after = cache.get_or_try_insert_with(1, || build(1)).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_concurrent_requests_construct_once() {
        let cache = Arc::new(Cache::new(4));
        let constructions = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let constructions = Arc::clone(&constructions);
                thread::spawn(move || {
                    cache
                        .get_or_try_insert_with(7, || {
                            constructions.fetch_add(1, Ordering::SeqCst);
                            build(7)
                        })
                        .unwrap()
                })
            })
            .collect();

        let handles: Vec<Arc<String>> = workers.into_iter().map(|w| w.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn test_concurrent_mixed_keys_respect_capacity() {
        let cache = Arc::new(Cache::new(3));

        let workers: Vec<_> = (0..32u32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let key = i % 6;
                    cache.get_or_try_insert_with(key, || build(key)).unwrap();
                    assert!(cache.len() <= 3);
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(cache.len(), 3);
    }
}
