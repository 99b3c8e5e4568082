//! Invocation result and prune ledger models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized result of one agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Text produced by the agent run.
    pub response: String,
    /// Conversation thread identifier, generated when the caller
    /// supplies none.
    pub session_id: String,
    /// Content type of the response (e.g. "text/markdown").
    pub content_type: String,
}

/// Generate a globally unique session identifier.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Ledger record for the memory-prune gate, one per (agent, user)
/// pair. The entry self-expires with the rolling window; its absence
/// is the "prune is due" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneLedgerEntry {
    pub last_pruned_at: DateTime<Utc>,
}

impl PruneLedgerEntry {
    pub fn now() -> Self {
        Self { last_pruned_at: Utc::now() }
    }
}
