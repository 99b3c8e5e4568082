//! Agent invocation orchestrator.
//!
//! One invocation: resolve the configuration (cache hit or repository
//! fallback), mint a session id when the caller supplies none, ask the
//! gate whether memory pruning is due, delegate to the runner, and
//! normalize its output. Runner failures propagate untouched; retries,
//! if desired, are the runner's responsibility.

use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_session_id, ExecutionResult};
use crate::domain::ports::{AgentInvocation, AgentRepository, AgentRunner};
use crate::services::config_resolver::AgentConfigResolver;
use crate::services::prune_gate::MemoryPruneGate;

pub struct ExecutionOrchestrator<R: AgentRepository> {
    resolver: Arc<AgentConfigResolver<R>>,
    gate: MemoryPruneGate,
    runner: Arc<dyn AgentRunner>,
}

impl<R: AgentRepository> ExecutionOrchestrator<R> {
    pub fn new(
        resolver: Arc<AgentConfigResolver<R>>,
        gate: MemoryPruneGate,
        runner: Arc<dyn AgentRunner>,
    ) -> Self {
        Self { resolver, gate, runner }
    }

    /// Invoke an agent.
    ///
    /// Returns `Ok(None)` when the agent id does not resolve, so the
    /// caller can render a not-found outcome.
    pub async fn execute_agent_action(
        &self,
        agent_id: i64,
        prompt: &str,
        user_id: &str,
        session_id: Option<String>,
    ) -> DomainResult<Option<ExecutionResult>> {
        let Some(configuration) = self.resolver.resolve(agent_id).await? else {
            return Ok(None);
        };

        let session_id = session_id.unwrap_or_else(new_session_id);
        let prune_memories = self.gate.should_prune(agent_id, user_id).await;
        debug!(agent_id, user_id, session_id = %session_id, prune_memories, "invoking agent");

        let invocation = AgentInvocation {
            configuration,
            prompt: prompt.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.clone(),
            prune_memories,
        };

        let output = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| DomainError::ExecutionFailed(e.to_string()))?;

        Ok(Some(ExecutionResult {
            response: output.content,
            session_id,
            content_type: output.content_type,
        }))
    }
}
