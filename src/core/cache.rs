use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// How long a cached API response stays valid.
pub const DEFAULT_RESPONSE_TTL: Duration = Duration::from_secs(300);

/// Time source for cache entries. Injected so expiry is testable
/// without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// TTL-based in-memory cache with thread-safe access.
///
/// Entries expire lazily: an expired entry is removed by the `get` that
/// observes it. There is no capacity bound and no background sweep.
/// Clones share the same storage, which is how the cache is handed to
/// the service layer.
pub struct TtlCache<K, V> {
    storage: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            ttl: self.ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_RESPONSE_TTL)
    }

    /// Return the stored value while `now - stored_at < TTL`. A read at
    /// or past the boundary evicts the entry and reports a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut storage = self.storage.write().ok()?;

        match storage.get(key) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                storage.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `(value, now)`, unconditionally replacing any prior entry
    /// and its timestamp.
    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut storage) = self.storage.write() {
            storage.insert(
                key,
                CacheEntry {
                    value,
                    stored_at: self.clock.now(),
                },
            );
        }
    }

    /// Empty all entries. Callable at any time; never fails.
    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage.write() {
            storage.clear();
        }
    }

    /// Number of stored entries, expired ones included (they linger
    /// until a `get` observes them).
    pub fn len(&self) -> usize {
        self.storage.read().map(|storage| storage.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide cache of transformed API responses, keyed by
/// endpoint + serialized filters.
pub type ResponseCache = TtlCache<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Clock whose time only moves when a test advances it.
    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Instant::now()),
            })
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_basic_get_insert() {
        let cache: TtlCache<String, String> = TtlCache::new(TTL);

        cache.insert("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"key2".to_string()), None);
    }

    #[test]
    fn test_entry_valid_strictly_before_ttl() {
        let clock = ManualClock::new();
        let clock_dyn: Arc<dyn Clock> = clock.clone();
        let cache: TtlCache<String, u32> = TtlCache::with_clock(TTL, clock_dyn);

        cache.insert("k".to_string(), 7);
        clock.advance(TTL - Duration::from_millis(1));
        assert_eq!(cache.get(&"k".to_string()), Some(7));
    }

    #[test]
    fn test_entry_expires_at_exact_ttl() {
        let clock = ManualClock::new();
        let clock_dyn: Arc<dyn Clock> = clock.clone();
        let cache: TtlCache<String, u32> = TtlCache::with_clock(TTL, clock_dyn);

        cache.insert("k".to_string(), 7);
        clock.advance(TTL);
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn test_expired_read_removes_entry() {
        let clock = ManualClock::new();
        let clock_dyn: Arc<dyn Clock> = clock.clone();
        let cache: TtlCache<String, u32> = TtlCache::with_clock(TTL, clock_dyn);

        cache.insert("k".to_string(), 7);
        clock.advance(TTL + Duration::from_secs(1));
        assert_eq!(cache.get(&"k".to_string()), None);
        // The eviction happened on read, not just the miss.
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn test_insert_replaces_entry_and_timestamp() {
        let clock = ManualClock::new();
        let clock_dyn: Arc<dyn Clock> = clock.clone();
        let cache: TtlCache<String, u32> = TtlCache::with_clock(TTL, clock_dyn);

        cache.insert("k".to_string(), 1);
        clock.advance(TTL - Duration::from_secs(1));
        cache.insert("k".to_string(), 2);
        // Past the first entry's deadline but within the second's.
        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get(&"k".to_string()), Some(2));
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache: TtlCache<String, u32> = TtlCache::new(TTL);

        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache: TtlCache<String, u32> = TtlCache::new(TTL);
        let shared = cache.clone();

        cache.insert("k".to_string(), 9);
        assert_eq!(shared.get(&"k".to_string()), Some(9));

        shared.clear();
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn test_default_ttl_is_five_minutes() {
        assert_eq!(DEFAULT_RESPONSE_TTL, Duration::from_secs(300));
    }
}
