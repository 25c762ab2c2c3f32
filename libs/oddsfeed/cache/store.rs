//! Generic TTL store with single-flight population
//!
//! Every key owns a slot holding a `tokio::sync::OnceCell`. Concurrent
//! callers for the same uncached key all await the same cell, so the
//! populate future runs once. Slots for other keys are untouched while a
//! population is in flight.

use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::debug;

type Slot<V> = Arc<OnceCell<(V, Instant)>>;
type RetainFn<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

pub struct CacheStore<K, V> {
    name: &'static str,
    ttl: Duration,
    slots: DashMap<K, Slot<V>>,
    retain: Option<RetainFn<V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slots: DashMap::new(),
            retain: None,
        }
    }

    /// Values failing `predicate` are handed to the callers waiting on them
    /// and then evicted
    pub fn with_retention(mut self, predicate: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.retain = Some(Arc::new(predicate));
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, loaded_at: Instant) -> bool {
        loaded_at.elapsed() < self.ttl
    }

    /// Slot for `key`, replacing it when its value has expired
    fn slot(&self, key: &K) -> Slot<V> {
        let mut entry = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        let expired = matches!(entry.get(), Some((_, loaded_at)) if !self.is_fresh(*loaded_at));
        if expired {
            debug!("[{}] Entry {:?} expired", self.name, key);
            *entry = Arc::new(OnceCell::new());
        }
        Arc::clone(entry.value())
    }

    /// Cached value for `key`, populating it with `populate` when missing
    ///
    /// A failed population is not cached; the next caller tries again.
    pub async fn get_or_populate<F, Fut, E>(&self, key: &K, populate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let (value, _) = slot
            .get_or_try_init(|| async move {
                debug!("[{}] Populating {:?}", self.name, key);
                populate().await.map(|value| (value, Instant::now()))
            })
            .await?;
        let value = value.clone();

        if let Some(retain) = &self.retain {
            if !retain(&value) {
                self.slots
                    .remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
            }
        }

        Ok(value)
    }

    /// Fresh value for `key`, never waiting on a population
    pub fn peek(&self, key: &K) -> Option<V> {
        let slot = self.slots.get(key)?;
        match slot.get() {
            Some((value, loaded_at)) if self.is_fresh(*loaded_at) => Some(value.clone()),
            _ => None,
        }
    }

    /// Last populated value for `key`, expired or not
    pub fn peek_stale(&self, key: &K) -> Option<V> {
        self.slots.get(key)?.get().map(|(value, _)| value.clone())
    }

    /// Store `value` for `key` as if it had just been populated
    pub fn insert(&self, key: K, value: V) {
        let cell = OnceCell::new_with(Some((value, Instant::now())));
        self.slots.insert(key, Arc::new(cell));
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let (_, slot) = self.slots.remove(key)?;
        slot.get().map(|(value, _)| value.clone())
    }

    /// Drop expired values; slots still being populated are kept
    pub fn purge_expired(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| match slot.get() {
            Some((_, loaded_at)) => self.is_fresh(*loaded_at),
            None => true,
        });
        let purged = before.saturating_sub(self.slots.len());
        if purged > 0 {
            debug!("[{}] Purged {} expired entries", self.name, purged);
        }
        purged
    }

    /// Keys with a populated value
    pub fn keys(&self) -> Vec<K> {
        self.slots
            .iter()
            .filter(|slot| slot.value().initialized())
            .map(|slot| slot.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_concurrent_callers_share_one_population() {
        let store = Arc::new(CacheStore::<u32, String>::new("test", Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    store
                        .get_or_populate(&7, || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, ()>("seven".to_string())
                        })
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), "seven");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let store = CacheStore::<u32, u32>::new("test", Duration::from_secs(60));
        let failed: Result<u32, &str> = store.get_or_populate(&1, || async { Err("boom") }).await;
        assert!(failed.is_err());
        let ok: Result<u32, &str> = store.get_or_populate(&1, || async { Ok(5) }).await;
        assert_eq!(ok.unwrap(), 5);
        assert_eq!(store.peek(&1), Some(5));
    }

    #[tokio::test]
    async fn test_retention_evicts_after_serving() {
        let store = CacheStore::<u32, Option<u32>>::new("test", Duration::from_secs(60))
            .with_retention(Option::is_some);
        let value: Result<_, ()> = store.get_or_populate(&1, || async { Ok(None) }).await;
        assert_eq!(value.unwrap(), None);
        assert!(store.peek(&1).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entries_are_repopulated() {
        let store = CacheStore::<u32, u32>::new("test", Duration::from_millis(10));
        store.insert(1, 1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.peek(&1), None);
        assert_eq!(store.peek_stale(&1), Some(1));

        let value: Result<u32, ()> = store.get_or_populate(&1, || async { Ok(2) }).await;
        assert_eq!(value.unwrap(), 2);
        assert_eq!(store.purge_expired(), 0);
    }
}
