use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Injected time source so eviction is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

struct Inner<K, V> {
    map: HashMap<K, Entry<V>>,
    /// Recency order, least-recently-used first.
    recency: Vec<K>,
}

/// Size-bounded LRU cache with a TTL, guarded by a single mutex.
///
/// Owned by the process lifetime and passed by reference to the components
/// that need it; there is deliberately no ambient/global cache state.
pub struct CacheService<K, V> {
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> CacheService<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            clock,
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                recency: Vec::new(),
            }),
        }
    }

    /// Fresh value for the key, if present; refreshes its recency.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().expect("cache poisoned");

        let expired = match inner.map.get(key) {
            None => return None,
            Some(entry) => now.duration_since(entry.stored_at) >= self.ttl,
        };

        if expired {
            inner.map.remove(key);
            inner.recency.retain(|k| k != key);
            return None;
        }

        inner.recency.retain(|k| k != key);
        inner.recency.push(key.clone());
        inner.map.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, evicting the least-recently-used entry at capacity.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().expect("cache poisoned");

        if !inner.map.contains_key(&key) && inner.map.len() >= self.capacity {
            if let Some(oldest) = inner.recency.first().cloned() {
                inner.map.remove(&oldest);
                inner.recency.retain(|k| k != &oldest);
            }
        }

        inner.recency.retain(|k| k != &key);
        inner.recency.push(key.clone());
        inner.map.insert(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    pub fn remove(&self, key: &K) {
        let mut inner = self.inner.lock().expect("cache poisoned");
        inner.map.remove(key);
        inner.recency.retain(|k| k != key);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
