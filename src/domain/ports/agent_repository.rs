//! Agent repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentEntity, AgentPatch, AgentSummary, NewAgent, ToolEntity};

/// Repository interface for agent persistence.
///
/// `get_agent_by_id` returns the full entity with its tool list fanned
/// out; the listing returns a light projection. Absence is `None`, not
/// an error, so callers can render a not-found outcome.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Get an agent with its tools by identifier.
    async fn get_agent_by_id(&self, agent_id: i64) -> DomainResult<Option<AgentEntity>>;

    /// Persist a new agent and return the stored entity.
    async fn create_agent(&self, draft: &NewAgent) -> DomainResult<AgentEntity>;

    /// Apply a partial update. Returns `None` when the agent does not
    /// exist.
    async fn update_agent(&self, agent_id: i64, patch: &AgentPatch)
        -> DomainResult<Option<AgentEntity>>;

    /// List agents whose name contains `name_filter`, paged.
    async fn get_all_agents(
        &self,
        name_filter: &str,
        offset: i64,
        limit: i64,
    ) -> DomainResult<Vec<AgentSummary>>;

    // Tool registry operations

    /// Register a tool.
    async fn create_tool(&self, name: &str, description: &str) -> DomainResult<ToolEntity>;

    /// Fetch tools by identifier, preserving the requested order and
    /// skipping unknown ids.
    async fn get_tools_by_ids(&self, tool_ids: &[i64]) -> DomainResult<Vec<ToolEntity>>;

    /// List every registered tool.
    async fn get_all_tools(&self) -> DomainResult<Vec<ToolEntity>>;
}
