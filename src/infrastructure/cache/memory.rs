//! In-memory cache backend.
//!
//! A mutex-guarded table with per-entry optional expiry. Expired
//! entries are evicted lazily on lookup and physically reclaimed by a
//! background sweep task, so keys that are never read again do not
//! accumulate. The sweep never holds the table lock across its sleep.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::debug;

use crate::domain::ports::cache_store::{CacheBackend, CacheResult};

/// Default interval between expiry sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Process-local cache backend.
pub struct InMemoryCacheBackend {
    store: Arc<Mutex<HashMap<String, CacheEntry>>>,
    cleanup_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    shutdown: Arc<Notify>,
}

impl InMemoryCacheBackend {
    /// Create a backend with the default sweep interval.
    pub fn new() -> Self {
        Self::with_cleanup_interval(DEFAULT_CLEANUP_INTERVAL)
    }

    /// Create a backend with a custom sweep interval.
    pub fn with_cleanup_interval(cleanup_interval: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(HashMap::new())),
            cleanup_interval,
            sweeper: Mutex::new(None),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Number of physically present entries, expired or not.
    pub async fn entry_count(&self) -> usize {
        self.store.lock().await.len()
    }

    async fn sweep(store: &Mutex<HashMap<String, CacheEntry>>) -> usize {
        let now = Instant::now();
        let mut table = store.lock().await;
        let before = table.len();
        table.retain(|_, entry| !entry.is_expired(now));
        before - table.len()
    }
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn connect(&self) -> CacheResult<()> {
        let mut sweeper = self.sweeper.lock().await;
        if sweeper.is_some() {
            return Ok(());
        }

        let store = Arc::clone(&self.store);
        let shutdown = Arc::clone(&self.shutdown);
        let cleanup_interval = self.cleanup_interval;

        *sweeper = Some(tokio::spawn(async move {
            let mut ticker = interval(cleanup_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = Self::sweep(&store).await;
                        if evicted > 0 {
                            debug!(evicted, "cache sweep evicted expired entries");
                        }
                    }
                    _ = shutdown.notified() => break,
                }
            }
        }));

        Ok(())
    }

    async fn disconnect(&self) -> CacheResult<()> {
        let task = self.sweeper.lock().await.take();
        if let Some(task) = task {
            self.shutdown.notify_one();
            // Expected shutdown; a join error here is not a failure.
            let _ = task.await;
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        let mut table = self.store.lock().await;
        if table.get(key).is_some_and(|entry| entry.is_expired(now)) {
            table.remove(key);
            return Ok(None);
        }
        Ok(table.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        let mut table = self.store.lock().await;
        table.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.store.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_get_honors_ttl_without_sweep() {
        let cache = InMemoryCacheBackend::new();

        cache
            .set("k", json!("v"), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("v")));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lookup_evicts_entry() {
        let cache = InMemoryCacheBackend::new();

        cache
            .set("k", json!(1), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_frees_unread_entries() {
        let cache = InMemoryCacheBackend::with_cleanup_interval(Duration::from_secs(5));
        cache.connect().await.unwrap();

        cache
            .set("dead", json!("x"), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache.set("live", json!("y"), None).await.unwrap();

        // Past expiry plus one sweep interval; the key is never read.
        tokio::time::sleep(Duration::from_secs(7)).await;
        tokio::task::yield_now().await;

        assert_eq!(cache.entry_count().await, 1);
        assert_eq!(cache.get("live").await.unwrap(), Some(json!("y")));

        cache.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let cache = InMemoryCacheBackend::new();
        cache.connect().await.unwrap();
        cache.connect().await.unwrap();
        cache.disconnect().await.unwrap();
        // A disconnected backend can be started again.
        cache.connect().await.unwrap();
        cache.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_is_noop() {
        let cache = InMemoryCacheBackend::new();
        cache.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let cache = InMemoryCacheBackend::new();

        cache.set("k", json!("old"), None).await.unwrap();
        cache
            .set("k", json!("new"), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!("new")));
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let cache = InMemoryCacheBackend::new();

        cache.set("a", json!(1), None).await.unwrap();
        cache.set("b", json!(2), None).await.unwrap();

        cache.delete("a").await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);
        cache.delete("a").await.unwrap();

        cache.clear().await.unwrap();
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_payload_round_trip_preserves_nulls() {
        let cache = InMemoryCacheBackend::new();
        let payload = json!({"a": 1, "b": null});

        cache
            .set("k", payload.clone(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(payload));
    }
}
