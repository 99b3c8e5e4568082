//! Agent registry service.
//!
//! CRUD over the repository with write-path cache coherence: every
//! successful create or update refreshes the resolver's cache entry in
//! the same logical operation, so a resolve immediately following a
//! write never observes the pre-update value.

use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentConfiguration, AgentEntity, AgentPatch, AgentSummary, NewAgent,
};
use crate::domain::ports::AgentRepository;
use crate::services::config_resolver::AgentConfigResolver;

/// Listing page size applied when the caller leaves it unset.
const DEFAULT_LIST_LIMIT: i64 = 100;

pub struct AgentService<R: AgentRepository> {
    repository: Arc<R>,
    resolver: Arc<AgentConfigResolver<R>>,
}

impl<R: AgentRepository> AgentService<R> {
    pub fn new(repository: Arc<R>, resolver: Arc<AgentConfigResolver<R>>) -> Self {
        Self { repository, resolver }
    }

    /// List agents, name-filtered and paged.
    pub async fn get_all_agents(
        &self,
        name_filter: Option<&str>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> DomainResult<Vec<AgentSummary>> {
        let name_filter = name_filter.unwrap_or("");
        let offset = offset.unwrap_or(0).max(0);
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).max(0);
        self.repository.get_all_agents(name_filter, offset, limit).await
    }

    /// Resolve an agent's materialized configuration, cache-first.
    pub async fn get_agent_by_id(
        &self,
        agent_id: i64,
    ) -> DomainResult<Option<AgentConfiguration>> {
        self.resolver.resolve(agent_id).await
    }

    /// Register a new agent.
    pub async fn create_agent(&self, draft: &NewAgent) -> DomainResult<AgentEntity> {
        draft.validate().map_err(DomainError::ValidationFailed)?;

        let entity = self.repository.create_agent(draft).await?;
        self.resolver.refresh(&entity).await;
        info!(agent_id = entity.id, name = %entity.name, "agent created");
        Ok(entity)
    }

    /// Apply a partial update. Returns `None` for an unknown agent.
    pub async fn update_agent(
        &self,
        agent_id: i64,
        patch: &AgentPatch,
    ) -> DomainResult<Option<AgentEntity>> {
        patch.validate().map_err(DomainError::ValidationFailed)?;

        let Some(entity) = self.repository.update_agent(agent_id, patch).await? else {
            return Ok(None);
        };
        self.resolver.refresh(&entity).await;
        info!(agent_id, "agent updated");
        Ok(Some(entity))
    }
}
