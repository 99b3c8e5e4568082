//! Cache manager facade.
//!
//! Owns the backend behind `Arc<dyn CacheBackend>` and exposes the
//! same operations, so application code does not change when the
//! in-memory backend is swapped for a distributed one. Constructed
//! once at startup and passed explicitly to the components that need
//! it; there is no process-global instance.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::CacheConfig;
use crate::domain::ports::cache_store::{CacheBackend, CacheResult};

use super::memory::InMemoryCacheBackend;

pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Option<Duration>,
}

impl CacheManager {
    /// Wrap an existing backend with no default TTL.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend, default_ttl: None }
    }

    /// Apply `ttl` to `set` calls that do not carry their own.
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Build an in-memory-backed manager from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        let backend = InMemoryCacheBackend::with_cleanup_interval(Duration::from_secs(
            config.cleanup_interval_secs,
        ));
        Self::new(Arc::new(backend))
            .with_default_ttl(config.ttl_secs.map(Duration::from_secs))
    }

    pub async fn connect(&self) -> CacheResult<()> {
        self.backend.connect().await
    }

    pub async fn disconnect(&self) -> CacheResult<()> {
        self.backend.disconnect().await
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()> {
        self.backend.set(key, value, ttl.or(self.default_ttl)).await
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        self.backend.delete(key).await
    }

    pub async fn clear(&self) -> CacheResult<()> {
        self.backend.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_applies_when_none_given() {
        let config = CacheConfig { ttl_secs: Some(30), cleanup_interval_secs: 5 };
        let cache = CacheManager::from_config(&config);

        cache.set("k", json!(1), None).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_ttl_wins_over_default() {
        let config = CacheConfig { ttl_secs: Some(1), cleanup_interval_secs: 5 };
        let cache = CacheManager::from_config(&config);

        cache
            .set("k", json!(1), Some(Duration::from_secs(120)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_no_default_means_no_expiry() {
        let cache = CacheManager::from_config(&CacheConfig::default());
        cache.set("k", json!("v"), None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("v")));
    }
}
