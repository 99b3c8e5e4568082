//! Rolling-window gate for memory pruning.
//!
//! Pruning a user's stored memories is an expensive maintenance action
//! that should run at most once per (agent, user) pair within a
//! rolling window. The gate keeps a ledger entry per pair in the
//! cache, TTL'd to the window length, so the ledger cleans itself up:
//! once the entry expires, its absence is the "prune is due" signal.
//!
//! Two concurrent first contacts may both see an absent ledger and
//! both report the prune as due. That race is accepted; pruning is
//! idempotent and the second ledger write wins with the same window.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::models::PruneLedgerEntry;
use crate::infrastructure::cache::CacheManager;

/// Key namespace owned by the gate. Never reuse this prefix in
/// another component.
const LEDGER_KEY_PREFIX: &str = "prune-ledger:";

/// Default rolling window: one prune per pair per day.
pub const DEFAULT_PRUNE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

pub struct MemoryPruneGate {
    cache: Arc<CacheManager>,
    window: Duration,
}

impl MemoryPruneGate {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self::with_window(cache, DEFAULT_PRUNE_WINDOW)
    }

    pub fn with_window(cache: Arc<CacheManager>, window: Duration) -> Self {
        Self { cache, window }
    }

    fn ledger_key(agent_id: i64, user_id: &str) -> String {
        format!("{LEDGER_KEY_PREFIX}{agent_id}:{user_id}")
    }

    /// Decide whether pruning is due for this (agent, user) pair,
    /// recording the decision when it is.
    ///
    /// Cache faults degrade to "due": worst case an extra idempotent
    /// prune, never a failed invocation.
    pub async fn should_prune(&self, agent_id: i64, user_id: &str) -> bool {
        let key = Self::ledger_key(agent_id, user_id);

        let existing = match self.cache.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(agent_id, user_id, error = %e, "prune ledger read failed, treating as absent");
                None
            }
        };

        if let Some(value) = existing {
            match serde_json::from_value::<PruneLedgerEntry>(value) {
                Ok(entry) => {
                    let elapsed = Utc::now().signed_duration_since(entry.last_pruned_at);
                    let within_window = elapsed
                        .to_std()
                        .map(|elapsed| elapsed <= self.window)
                        // A future timestamp counts as within the window.
                        .unwrap_or(true);
                    if within_window {
                        return false;
                    }
                }
                Err(e) => {
                    warn!(agent_id, user_id, error = %e, "discarding undeserializable prune ledger entry");
                }
            }
        }

        self.record(&key, agent_id, user_id).await;
        true
    }

    async fn record(&self, key: &str, agent_id: i64, user_id: &str) {
        let entry = PruneLedgerEntry::now();
        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                warn!(agent_id, user_id, error = %e, "prune ledger entry did not serialize");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, value, Some(self.window)).await {
            warn!(agent_id, user_id, error = %e, "prune ledger write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::json;

    fn cache() -> Arc<CacheManager> {
        Arc::new(CacheManager::new(Arc::new(
            crate::infrastructure::cache::InMemoryCacheBackend::new(),
        )))
    }

    #[tokio::test]
    async fn test_first_contact_is_due() {
        let gate = MemoryPruneGate::new(cache());
        assert!(gate.should_prune(7, "user-1").await);
    }

    #[tokio::test]
    async fn test_second_call_within_window_is_not_due() {
        let gate = MemoryPruneGate::new(cache());
        assert!(gate.should_prune(7, "user-1").await);
        assert!(!gate.should_prune(7, "user-1").await);
    }

    #[tokio::test]
    async fn test_pairs_are_independent() {
        let gate = MemoryPruneGate::new(cache());
        assert!(gate.should_prune(7, "user-1").await);
        assert!(gate.should_prune(7, "user-2").await);
        assert!(gate.should_prune(8, "user-1").await);
        assert!(!gate.should_prune(7, "user-1").await);
    }

    #[tokio::test]
    async fn test_stale_ledger_entry_is_due_again() {
        let cache = cache();
        let stale = PruneLedgerEntry {
            last_pruned_at: Utc::now() - ChronoDuration::hours(25),
        };
        cache
            .set(
                "prune-ledger:7:user-1",
                serde_json::to_value(&stale).unwrap(),
                None,
            )
            .await
            .unwrap();

        let gate = MemoryPruneGate::new(Arc::clone(&cache));
        assert!(gate.should_prune(7, "user-1").await);
        // The decision was re-recorded.
        assert!(!gate.should_prune(7, "user-1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_ledger_entry_is_due_again() {
        let cache = cache();
        let gate = MemoryPruneGate::with_window(cache, Duration::from_secs(60));

        assert!(gate.should_prune(7, "user-1").await);
        // The ledger TTL elapses; absence reproduces the first-contact
        // branch.
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(gate.should_prune(7, "user-1").await);
    }

    #[tokio::test]
    async fn test_corrupt_ledger_entry_is_due() {
        let cache = cache();
        cache
            .set("prune-ledger:7:user-1", json!(42), None)
            .await
            .unwrap();

        let gate = MemoryPruneGate::new(Arc::clone(&cache));
        assert!(gate.should_prune(7, "user-1").await);
    }
}
