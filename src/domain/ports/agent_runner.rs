//! Agent runner port.
//!
//! The runner is the opaque execution engine behind an invocation:
//! prompt submission, tool dispatch, and knowledge retrieval all live
//! behind it. The orchestrator hands it a resolved configuration and
//! gets back a structured output; retries, if any, are the runner's
//! responsibility.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::AgentConfiguration;

/// One invocation handed to the runner.
#[derive(Debug, Clone)]
pub struct AgentInvocation {
    /// Resolved agent configuration.
    pub configuration: AgentConfiguration,

    /// User prompt text.
    pub prompt: String,

    /// Identifier of the invoking user.
    pub user_id: String,

    /// Conversation thread identifier.
    pub session_id: String,

    /// Whether the runner should prune this user's stored memories
    /// before the run. Pruning is idempotent.
    pub prune_memories: bool,
}

/// Raw output returned by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerOutput {
    pub content: String,
    pub content_type: String,
}

/// A stored user memory as exposed by the runner's memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMemory {
    pub memory_id: String,
    pub memory: String,
}

/// Error types for runner operations.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Runner not configured: {0}")]
    NotConfigured(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Execution timeout after {0}s")]
    Timeout(u64),
}

/// Memory store surface exposed by runner implementations, used by the
/// prune action. Deleting an already-deleted memory is a no-op.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn get_user_memories(&self, user_id: &str) -> Result<Vec<UserMemory>, RunnerError>;

    async fn delete_user_memory(&self, memory_id: &str) -> Result<(), RunnerError>;
}

/// Port trait for agent execution engines.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Execute one invocation and return its structured output.
    async fn run(&self, invocation: AgentInvocation) -> Result<RunnerOutput, RunnerError>;
}
