//! SQLite implementation of the AgentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool};
use std::collections::HashMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentEntity, AgentPatch, AgentSummary, KnowledgeParams, ModelBackend, NewAgent, ToolEntity,
};
use crate::domain::ports::AgentRepository;

#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: SqlitePool,
}

impl SqliteAgentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: i64,
    name: String,
    description: String,
    model: i64,
    model_type: String,
    tools: String,
    reasoning: bool,
    output_parser: Option<String>,
    instructions: Option<String>,
    storage_enabled: bool,
    knowledge: Option<String>,
    created_at: String,
    updated_at: String,
}

impl AgentRow {
    fn tool_ids(&self) -> DomainResult<Vec<i64>> {
        Ok(serde_json::from_str(&self.tools)?)
    }

    fn into_entity(self, tools: Vec<ToolEntity>) -> DomainResult<AgentEntity> {
        let model = ModelBackend::from_i64(self.model).ok_or_else(|| {
            DomainError::SerializationError(format!("unknown model backend code {}", self.model))
        })?;

        let knowledge: Option<KnowledgeParams> = self
            .knowledge
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(AgentEntity {
            id: self.id,
            name: self.name,
            description: self.description,
            model,
            model_type: self.model_type,
            tools,
            reasoning: self.reasoning,
            output_parser: self.output_parser,
            instructions: self.instructions,
            storage_enabled: self.storage_enabled,
            knowledge,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ToolRow {
    id: i64,
    name: String,
    description: String,
}

impl From<ToolRow> for ToolEntity {
    fn from(row: ToolRow) -> Self {
        Self { id: row.id, name: row.name, description: row.description }
    }
}

fn parse_timestamp(raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::SerializationError(format!("invalid timestamp '{raw}': {e}")))
}

#[async_trait]
impl AgentRepository for SqliteAgentRepository {
    async fn get_agent_by_id(&self, agent_id: i64) -> DomainResult<Option<AgentEntity>> {
        let row: Option<AgentRow> = sqlx::query_as("SELECT * FROM agents WHERE id = ?")
            .bind(agent_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tools = self.get_tools_by_ids(&row.tool_ids()?).await?;
        row.into_entity(tools).map(Some)
    }

    async fn create_agent(&self, draft: &NewAgent) -> DomainResult<AgentEntity> {
        let tools_json = serde_json::to_string(&draft.tool_ids)?;
        let knowledge_json = draft
            .knowledge
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"INSERT INTO agents (name, description, model, model_type, tools, reasoning,
               output_parser, instructions, storage_enabled, knowledge, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.model.as_i64())
        .bind(&draft.model_type)
        .bind(&tools_json)
        .bind(draft.reasoning)
        .bind(&draft.output_parser)
        .bind(&draft.instructions)
        .bind(draft.storage_enabled)
        .bind(&knowledge_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let agent_id = result.last_insert_rowid();
        self.get_agent_by_id(agent_id).await?.ok_or_else(|| {
            DomainError::DatabaseError(format!("agent {agent_id} missing after insert"))
        })
    }

    async fn update_agent(
        &self,
        agent_id: i64,
        patch: &AgentPatch,
    ) -> DomainResult<Option<AgentEntity>> {
        if patch.is_empty() {
            return self.get_agent_by_id(agent_id).await;
        }

        let mut builder = QueryBuilder::new("UPDATE agents SET updated_at = ");
        builder.push_bind(Utc::now().to_rfc3339());

        if let Some(ref name) = patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(ref description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(model) = patch.model {
            builder.push(", model = ").push_bind(model.as_i64());
        }
        if let Some(ref model_type) = patch.model_type {
            builder.push(", model_type = ").push_bind(model_type);
        }
        if let Some(ref tool_ids) = patch.tool_ids {
            builder.push(", tools = ").push_bind(serde_json::to_string(tool_ids)?);
        }
        if let Some(reasoning) = patch.reasoning {
            builder.push(", reasoning = ").push_bind(reasoning);
        }
        if let Some(ref output_parser) = patch.output_parser {
            builder.push(", output_parser = ").push_bind(output_parser);
        }
        if let Some(ref instructions) = patch.instructions {
            builder.push(", instructions = ").push_bind(instructions);
        }
        if let Some(storage_enabled) = patch.storage_enabled {
            builder.push(", storage_enabled = ").push_bind(storage_enabled);
        }
        if let Some(ref knowledge) = patch.knowledge {
            builder.push(", knowledge = ").push_bind(serde_json::to_string(knowledge)?);
        }

        builder.push(" WHERE id = ").push_bind(agent_id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_agent_by_id(agent_id).await
    }

    async fn get_all_agents(
        &self,
        name_filter: &str,
        offset: i64,
        limit: i64,
    ) -> DomainResult<Vec<AgentSummary>> {
        let pattern = format!("%{name_filter}%");
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, name FROM agents WHERE name LIKE ? ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| AgentSummary { id, name })
            .collect())
    }

    async fn create_tool(&self, name: &str, description: &str) -> DomainResult<ToolEntity> {
        let result = sqlx::query("INSERT INTO tools (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?;

        Ok(ToolEntity {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    async fn get_tools_by_ids(&self, tool_ids: &[i64]) -> DomainResult<Vec<ToolEntity>> {
        if tool_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut builder = QueryBuilder::new("SELECT id, name, description FROM tools WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in tool_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<ToolRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let mut by_id: HashMap<i64, ToolEntity> =
            rows.into_iter().map(|row| (row.id, row.into())).collect();

        // Requested order, unknown ids skipped.
        Ok(tool_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn get_all_tools(&self) -> DomainResult<Vec<ToolEntity>> {
        let rows: Vec<ToolRow> =
            sqlx::query_as("SELECT id, name, description FROM tools ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connection::create_test_pool;
    use crate::infrastructure::database::migrations::initialize_database;

    async fn repository() -> SqliteAgentRepository {
        let pool = create_test_pool().await.unwrap();
        initialize_database(&pool).await.unwrap();
        SqliteAgentRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_agent_with_tools() {
        let repo = repository().await;

        let search = repo.create_tool("search", "web search").await.unwrap();
        let math = repo.create_tool("math", "calculator").await.unwrap();

        let mut draft = NewAgent::new("researcher", ModelBackend::Claude, "claude-sonnet-4-5");
        draft.description = "finds things".to_string();
        draft.tool_ids = vec![math.id, search.id];
        draft.reasoning = true;
        draft.instructions = Some("be terse".to_string());
        draft.storage_enabled = true;
        draft.knowledge = Some(KnowledgeParams {
            collection: "papers".to_string(),
            description: "arxiv dump".to_string(),
            top_k: 3,
        });

        let created = repo.create_agent(&draft).await.unwrap();
        let fetched = repo.get_agent_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "researcher");
        assert_eq!(fetched.model, ModelBackend::Claude);
        // Tool order follows the agent's declared list, not the registry.
        assert_eq!(
            fetched.tools.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![math.id, search.id]
        );
        assert!(fetched.reasoning);
        assert_eq!(fetched.knowledge.unwrap().top_k, 3);
    }

    #[tokio::test]
    async fn test_get_missing_agent_returns_none() {
        let repo = repository().await;
        assert!(repo.get_agent_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_agent_partial() {
        let repo = repository().await;
        let created = repo
            .create_agent(&NewAgent::new("helper", ModelBackend::Gemini, "gemini-2.0"))
            .await
            .unwrap();

        let patch = AgentPatch {
            name: Some("helper-v2".to_string()),
            reasoning: Some(true),
            ..Default::default()
        };
        let updated = repo.update_agent(created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "helper-v2");
        assert!(updated.reasoning);
        // Untouched fields survive.
        assert_eq!(updated.model, ModelBackend::Gemini);
        assert_eq!(updated.model_type, "gemini-2.0");
    }

    #[tokio::test]
    async fn test_update_missing_agent_returns_none() {
        let repo = repository().await;
        let patch = AgentPatch { name: Some("ghost".to_string()), ..Default::default() };
        assert!(repo.update_agent(404, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_filters_and_pages() {
        let repo = repository().await;
        for name in ["alpha", "beta", "alphabet"] {
            repo.create_agent(&NewAgent::new(name, ModelBackend::Groq, "llama-3.3"))
                .await
                .unwrap();
        }

        let all = repo.get_all_agents("", 0, 100).await.unwrap();
        assert_eq!(all.len(), 3);

        let filtered = repo.get_all_agents("alpha", 0, 100).await.unwrap();
        assert_eq!(
            filtered.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            vec!["alpha", "alphabet"]
        );

        let paged = repo.get_all_agents("", 1, 1).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name, "beta");
    }

    #[tokio::test]
    async fn test_unknown_tool_ids_are_skipped() {
        let repo = repository().await;
        let tool = repo.create_tool("only", "the only one").await.unwrap();

        let tools = repo.get_tools_by_ids(&[99, tool.id]).await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].id, tool.id);
    }
}
