//! Time-bounded in-memory cache.
//!
//! `TtlCache` maps string keys to values with a fixed time-to-live.
//! Correctness comes from the lazy staleness check in `get`; a periodic
//! `Janitor` sweep exists purely for memory hygiene, so entries that
//! are never read again do not accumulate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

/// One cached value with its insertion time. Overwritten wholesale on
/// refresh; never partially updated.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A concurrent map from string keys to values with a fixed TTL.
///
/// Readers and writers interleave freely; overlapping puts to the same
/// key are last-writer-wins. A stale entry is never returned: `get`
/// checks age and evicts expired entries as a side effect.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a fresh value. Misses on absent or expired entries;
    /// expired entries are evicted immediately.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Explicit-timestamp variant of `get`, for deterministic tests.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                None => return None,
                Some(entry) => {
                    if now.saturating_duration_since(entry.inserted_at) <= self.ttl {
                        return Some(entry.value.clone());
                    }
                }
            }
        }
        // Present but stale: evict before reporting a miss.
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(key) {
            if now.saturating_duration_since(entry.inserted_at) > self.ttl {
                entries.remove(key);
                debug!(key, "evicted stale cache entry on read");
            }
        }
        None
    }

    /// Insert or overwrite a value with a fresh timestamp.
    pub fn put(&self, key: &str, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Explicit-timestamp variant of `put`, for deterministic tests.
    pub fn put_at(&self, key: &str, value: V, now: Instant) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), CacheEntry { value, inserted_at: now });
    }

    /// Remove every expired entry. Returns the number evicted. Safe on
    /// an empty cache.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Explicit-timestamp variant of `sweep`, for deterministic tests.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.inserted_at) <= self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Background sweep
// ---------------------------------------------------------------------------

/// Anything the janitor can sweep. Lets one background task service
/// caches holding different value types.
pub trait Sweepable: Send + Sync {
    fn sweep(&self) -> usize;
}

impl<V: Clone + Send + Sync> Sweepable for TtlCache<V> {
    fn sweep(&self) -> usize {
        TtlCache::sweep(self)
    }
}

/// Periodic background sweeper tied to its owner's lifetime.
///
/// The task runs on a fixed tokio interval and is aborted when the
/// handle is dropped, so it never outlives the caches it services.
pub struct Janitor {
    handle: tokio::task::JoinHandle<()>,
}

impl Janitor {
    pub fn spawn(caches: Vec<Arc<dyn Sweepable>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; skip it so a fresh cache
            // is not swept at startup.
            interval.tick().await;
            loop {
                interval.tick().await;
                let evicted: usize = caches.iter().map(|c| c.sweep()).sum();
                if evicted > 0 {
                    debug!(evicted, "janitor swept expired cache entries");
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_put_then_get() {
        let cache: TtlCache<String> = TtlCache::new(TTL);
        cache.put("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_get_absent_is_miss() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_miss_and_evicted() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("k", 7, t0);

        // One second past the TTL: miss, and the entry is gone.
        assert_eq!(cache.get_at("k", t0 + TTL + Duration::from_secs(1)), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_entry_fresh_exactly_at_ttl() {
        // Staleness is strictly `age > ttl`.
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("k", 7, t0);
        assert_eq!(cache.get_at("k", t0 + TTL), Some(7));
    }

    #[test]
    fn test_put_overwrites() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("k", 1, t0);
        // Refresh just before expiry; the entry must survive a full TTL
        // from the refresh, not from the original insert.
        let t1 = t0 + TTL;
        cache.put_at("k", 2, t1);
        assert_eq!(cache.get_at("k", t1 + TTL), Some(2));
    }

    #[test]
    fn test_sweep_removes_expired_entries() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("old", 1, t0);
        cache.put_at("fresh", 2, t0 + TTL);

        let evicted = cache.sweep_at(t0 + TTL + Duration::from_secs(1));
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("fresh", t0 + TTL + Duration::from_secs(1)), Some(2));
    }

    #[test]
    fn test_sweep_empty_cache_is_noop() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        assert_eq!(cache.sweep(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_puts_last_writer_wins() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new(TTL));
        let mut handles = Vec::new();
        for i in 0..8u32 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    cache.put("shared", i * 1000 + j);
                    let _ = cache.get("shared");
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        // Some writer's final value is present and the map is intact.
        assert!(cache.get("shared").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_janitor_sweeps_in_background() {
        // Zero TTL: every entry is stale as soon as any time passes.
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new(Duration::ZERO));
        cache.put("k", 1);
        assert_eq!(cache.len(), 1);

        let _janitor = Janitor::spawn(
            vec![Arc::clone(&cache) as Arc<dyn Sweepable>],
            Duration::from_millis(20),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_janitor_stops_on_drop() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new(Duration::ZERO));
        let janitor = Janitor::spawn(
            vec![Arc::clone(&cache) as Arc<dyn Sweepable>],
            Duration::from_millis(10),
        );
        drop(janitor);
        tokio::time::sleep(Duration::from_millis(30)).await;

        // With the janitor gone, a new entry is only evicted lazily.
        cache.put("k", 1);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.len(), 1);
    }
}
