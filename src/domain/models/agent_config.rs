//! Materialized agent configuration.
//!
//! The cache-friendly projection of an agent entity: everything an
//! invocation needs, nothing the relational layer cares about. Built
//! once per resolve, written to the cache as JSON, never mutated in
//! place; a changed agent produces a new value under the same key.

use serde::{Deserialize, Serialize};

use super::agent::{AgentEntity, KnowledgeParams, ModelBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfiguration {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub model: ModelBackend,
    pub model_type: String,
    /// Tool identifiers, deduplicated, declaration order preserved.
    pub tool_ids: Vec<i64>,
    pub reasoning: bool,
    pub output_parser: Option<String>,
    pub instructions: Option<String>,
    pub storage_enabled: bool,
    pub knowledge: Option<KnowledgeParams>,
}

impl From<&AgentEntity> for AgentConfiguration {
    fn from(entity: &AgentEntity) -> Self {
        let mut tool_ids = Vec::with_capacity(entity.tools.len());
        for tool in &entity.tools {
            if !tool_ids.contains(&tool.id) {
                tool_ids.push(tool.id);
            }
        }

        Self {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            model: entity.model,
            model_type: entity.model_type.clone(),
            tool_ids,
            reasoning: entity.reasoning,
            output_parser: entity.output_parser.clone(),
            instructions: entity.instructions.clone(),
            storage_enabled: entity.storage_enabled,
            knowledge: entity.knowledge.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::agent::ToolEntity;
    use chrono::Utc;

    fn entity_with_tools(tool_ids: &[i64]) -> AgentEntity {
        let now = Utc::now();
        AgentEntity {
            id: 7,
            name: "researcher".to_string(),
            description: "finds things".to_string(),
            model: ModelBackend::Claude,
            model_type: "claude-sonnet-4-5".to_string(),
            tools: tool_ids
                .iter()
                .map(|&id| ToolEntity {
                    id,
                    name: format!("tool-{id}"),
                    description: String::new(),
                })
                .collect(),
            reasoning: true,
            output_parser: None,
            instructions: Some("be terse".to_string()),
            storage_enabled: true,
            knowledge: Some(KnowledgeParams {
                collection: "papers".to_string(),
                description: "arxiv dump".to_string(),
                top_k: 5,
            }),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tool_ids_deduplicated_in_order() {
        let entity = entity_with_tools(&[3, 1, 3, 2, 1]);
        let config = AgentConfiguration::from(&entity);
        assert_eq!(config.tool_ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let config = AgentConfiguration::from(&entity_with_tools(&[1, 2]));

        let value = serde_json::to_value(&config).unwrap();
        let restored: AgentConfiguration = serde_json::from_value(value).unwrap();

        assert_eq!(restored, config);
        assert_eq!(restored.knowledge.as_ref().unwrap().top_k, 5);
        assert!(restored.output_parser.is_none());
    }

    #[test]
    fn test_optional_fields_serialize_explicitly() {
        let mut config = AgentConfiguration::from(&entity_with_tools(&[]));
        config.instructions = None;
        config.knowledge = None;

        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("instructions").unwrap().is_null());
        assert!(value.get("knowledge").unwrap().is_null());
    }
}
