//! Read-through resolver for agent configurations.
//!
//! Resolving an agent by id normally requires a relational fan-out
//! over the agent row and its tool list. The resolver fronts that read
//! with the cache: hits deserialize straight from the cached JSON,
//! misses fall through to the repository and populate the entry with a
//! fixed TTL. Repository misses are never cached, so a create makes
//! the agent resolvable immediately.
//!
//! The cache is an optimization, never a correctness dependency: any
//! cache fault degrades to a miss with a logged warning, and the
//! repository answer stands.

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentConfiguration, AgentEntity};
use crate::domain::ports::AgentRepository;
use crate::infrastructure::cache::CacheManager;

/// Key namespace owned by the resolver. Never reuse this prefix in
/// another component.
const CONFIG_KEY_PREFIX: &str = "agent-config:";

/// How long a cached configuration stays fresh without a write.
const CONFIG_TTL: Duration = Duration::from_secs(300);

pub struct AgentConfigResolver<R: AgentRepository> {
    repository: Arc<R>,
    cache: Arc<CacheManager>,
}

impl<R: AgentRepository> AgentConfigResolver<R> {
    pub fn new(repository: Arc<R>, cache: Arc<CacheManager>) -> Self {
        Self { repository, cache }
    }

    fn cache_key(agent_id: i64) -> String {
        format!("{CONFIG_KEY_PREFIX}{agent_id}")
    }

    /// Resolve an agent id to its materialized configuration.
    ///
    /// Returns `None` when neither cache nor repository knows the id.
    pub async fn resolve(&self, agent_id: i64) -> DomainResult<Option<AgentConfiguration>> {
        let key = Self::cache_key(agent_id);

        match self.cache.get(&key).await {
            Ok(Some(value)) => match serde_json::from_value::<AgentConfiguration>(value) {
                Ok(config) => return Ok(Some(config)),
                Err(e) => {
                    warn!(agent_id, error = %e, "discarding undeserializable cached configuration");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(agent_id, error = %e, "cache read failed, falling back to repository");
            }
        }

        let Some(entity) = self.repository.get_agent_by_id(agent_id).await? else {
            return Ok(None);
        };

        let config = AgentConfiguration::from(&entity);
        self.write_back(&config).await;
        Ok(Some(config))
    }

    /// Overwrite the cached entry from a freshly written entity.
    ///
    /// Called after create/update commits so a resolve immediately
    /// following the write never observes the pre-update value. Best
    /// effort: a cache fault leaves staleness bounded by the TTL.
    pub async fn refresh(&self, entity: &AgentEntity) {
        let config = AgentConfiguration::from(entity);
        self.write_back(&config).await;
    }

    /// Drop the cached entry for an agent.
    pub async fn invalidate(&self, agent_id: i64) {
        if let Err(e) = self.cache.delete(&Self::cache_key(agent_id)).await {
            warn!(agent_id, error = %e, "cache invalidation failed");
        }
    }

    async fn write_back(&self, config: &AgentConfiguration) {
        let key = Self::cache_key(config.id);
        let value = match serde_json::to_value(config) {
            Ok(value) => value,
            Err(e) => {
                warn!(agent_id = config.id, error = %e, "configuration did not serialize for caching");
                return;
            }
        };
        if let Err(e) = self.cache.set(&key, value, Some(CONFIG_TTL)).await {
            warn!(agent_id = config.id, error = %e, "cache write failed");
        }
    }
}
