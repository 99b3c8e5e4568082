//! Domain models.

pub mod agent;
pub mod agent_config;
pub mod config;
pub mod execution;

pub use agent::{
    AgentEntity, AgentPatch, AgentSummary, KnowledgeParams, ModelBackend, NewAgent, ToolEntity,
};
pub use agent_config::AgentConfiguration;
pub use config::{CacheConfig, Config, DatabaseConfig, LoggingConfig};
pub use execution::{new_session_id, ExecutionResult, PruneLedgerEntry};
