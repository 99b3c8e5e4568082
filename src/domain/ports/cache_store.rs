//! Cache backend port.
//!
//! Key/value store with per-entry optional expiry. The in-memory
//! implementation is the process-local default; a distributed backend
//! (e.g. Redis) must satisfy the identical contract so callers stay
//! backend-agnostic. Absence is a normal return value, never an error;
//! only backend connectivity failures surface as `CacheError`, and
//! callers treat those as a miss plus a logged fault.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Error types for cache backend operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache backend failure: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Port trait for cache backend implementations.
///
/// All operations must be safe under concurrent callers and complete
/// in bounded time while the backend is reachable.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Start the backend. Idempotent: a second call on a live backend
    /// is a no-op.
    async fn connect(&self) -> CacheResult<()>;

    /// Stop the backend, cancelling background work and waiting for
    /// its orderly termination.
    async fn disconnect(&self) -> CacheResult<()>;

    /// Look up a key. An entry whose expiry has elapsed is absent and
    /// is evicted as a side effect of the lookup.
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value under a key, replacing any previous entry.
    /// `ttl` of `None` means the entry never expires.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a key. Removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry.
    async fn clear(&self) -> CacheResult<()>;
}
