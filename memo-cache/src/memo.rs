use crate::clock::{Clock, SystemClock};
use dashmap::DashMap;
use shared::TtlSeconds;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Entry count past which a successful insert triggers a synchronous sweep
/// of expired entries.
const DEFAULT_SWEEP_THRESHOLD: usize = 100;

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at_ms: u64,
    ttl: TtlSeconds,
}

impl<V> CacheEntry<V> {
    /// Valid while strictly less than the TTL has elapsed since insertion.
    fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < self.ttl.as_millis()
    }
}

/// Get-or-compute memoization cache with per-entry TTLs.
///
/// There is no request de-duplication: two concurrent misses for the same
/// key both invoke their producer, and the second writer's result silently
/// overwrites the first's. Accepted for read-mostly, loosely consistent
/// payloads such as trending data.
pub struct MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    sweep_threshold: usize,
}

impl<V> MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }

    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    /// Return the cached value for `key` if a fresh entry exists, otherwise
    /// invoke `produce`, store its result, and return it.
    ///
    /// A producer failure propagates to the caller untouched and leaves the
    /// cache exactly as it was, so a later call retries the producer.
    pub async fn get_or_compute<E, F, Fut>(
        &self,
        key: &str,
        ttl: TtlSeconds,
        produce: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        debug_assert!(!key.is_empty(), "cache key must be non-empty");

        let now_ms = self.clock.now_ms();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now_ms) {
                debug!(key, "memo cache hit");
                return Ok(entry.value.clone());
            }
        }

        // Miss or stale entry: recompute with no map lock held.
        let value = produce().await?;

        let now_ms = self.clock.now_ms();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                stored_at_ms: now_ms,
                ttl,
            },
        );

        if self.entries.len() > self.sweep_threshold {
            self.sweep(now_ms);
        }

        Ok(value)
    }

    /// Remove every entry whose TTL has elapsed. Runs synchronously on the
    /// inserting caller's path, never on a background timer.
    fn sweep(&self, now_ms: u64) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now_ms));
        debug!(
            removed = before - self.entries.len(),
            remaining = self.entries.len(),
            "swept expired memo cache entries"
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw presence check, ignoring freshness.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl<V> Default for MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Debug for MemoCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("entry_count", &self.entries.len())
            .field("sweep_threshold", &self.sweep_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manual_cache<V>(start_ms: u64) -> (MemoCache<V>, Arc<ManualClock>)
    where
        V: Clone + Send + Sync + 'static,
    {
        let clock = Arc::new(ManualClock::new(start_ms));
        (MemoCache::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_hit_within_ttl_invokes_producer_once() {
        let (cache, _clock) = manual_cache::<u32>(1_000);
        let calls = AtomicUsize::new(0);

        let first: Result<u32, Infallible> = cache
            .get_or_compute("k", TtlSeconds(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            })
            .await;
        let second: Result<u32, Infallible> = cache
            .get_or_compute("k", TtlSeconds(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(99)
            })
            .await;

        assert_eq!(first.unwrap(), 42);
        assert_eq!(second.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_triggers_recompute_and_overwrite() {
        let (cache, clock) = manual_cache::<u32>(1_000);
        let calls = AtomicUsize::new(0);

        let produce = |value: u32| {
            let calls = &calls;
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, Infallible>(value)
            }
        };

        let first = cache
            .get_or_compute("k", TtlSeconds(60), produce(1))
            .await
            .unwrap();
        assert_eq!(first, 1);

        // Exactly at the TTL boundary the entry is already stale.
        clock.advance_ms(60_000);

        let second = cache
            .get_or_compute("k", TtlSeconds(60), produce(2))
            .await
            .unwrap();
        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The overwrite replaced the entry wholesale: fresh again, new value.
        let third = cache
            .get_or_compute("k", TtlSeconds(60), produce(3))
            .await
            .unwrap();
        assert_eq!(third, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_recomputes() {
        let (cache, _clock) = manual_cache::<u32>(1_000);
        let calls = AtomicUsize::new(0);

        for expected in 1..=3u32 {
            let got = cache
                .get_or_compute("k", TtlSeconds(0), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, Infallible>(expected)
                })
                .await
                .unwrap();
            assert_eq!(got, expected);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_producer_propagates_and_does_not_poison() {
        let (cache, _clock) = manual_cache::<u32>(1_000);
        let calls = AtomicUsize::new(0);

        let failed: Result<u32, &str> = cache
            .get_or_compute("k", TtlSeconds(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("boom")
            })
            .await;
        assert_eq!(failed.unwrap_err(), "boom");
        assert!(!cache.contains("k"));

        // The failure was not cached: the next call retries the producer.
        let recovered: Result<u32, &str> = cache
            .get_or_compute("k", TtlSeconds(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(recovered.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sweep_removes_exactly_the_expired_subset() {
        let (cache, clock) = manual_cache::<u32>(1_000);

        for i in 0..60 {
            let key = format!("stale-{i}");
            cache
                .get_or_compute(&key, TtlSeconds(10), || async { Ok::<u32, Infallible>(i) })
                .await
                .unwrap();
        }
        clock.advance_ms(20_000);
        for i in 0..41 {
            let key = format!("live-{i}");
            cache
                .get_or_compute(&key, TtlSeconds(3_600), || async {
                    Ok::<u32, Infallible>(i)
                })
                .await
                .unwrap();
        }

        // The 101st insert crossed the threshold and swept the stale set.
        assert_eq!(cache.len(), 41);
        assert!(!cache.contains("stale-0"));
        assert!(!cache.contains("stale-59"));
        assert!(cache.contains("live-0"));
        assert!(cache.contains("live-40"));

        // A swept key is a miss again; a retained key is still a hit.
        let calls = AtomicUsize::new(0);
        cache
            .get_or_compute("stale-0", TtlSeconds(10), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, Infallible>(0)
            })
            .await
            .unwrap();
        cache
            .get_or_compute("live-0", TtlSeconds(3_600), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, Infallible>(0)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sweep_does_not_run_below_threshold() {
        let (cache, clock) = manual_cache::<u32>(1_000);

        cache
            .get_or_compute("stale", TtlSeconds(1), || async { Ok::<u32, Infallible>(1) })
            .await
            .unwrap();
        clock.advance_ms(5_000);
        cache
            .get_or_compute("live", TtlSeconds(3_600), || async {
                Ok::<u32, Infallible>(2)
            })
            .await
            .unwrap();

        // Below the threshold the expired entry stays until touched.
        assert!(cache.contains("stale"));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_distinct_keys_cached_independently() {
        let (cache, _clock) = manual_cache::<u32>(1_000);
        let calls = AtomicUsize::new(0);

        for key in ["trends:AU:daily:b", "trends:AU:daily:e"] {
            cache
                .get_or_compute(key, TtlSeconds(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, Infallible>(1)
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }
}
