//! Agentry - agent registry and invocation backend
//!
//! Agentry registers, configures, and invokes LLM agents: configurable
//! pairings of a model backend with optional tools, persistent
//! conversational memory, and knowledge retrieval. Agent configuration
//! reads are fronted by a TTL cache with a pluggable backend, and an
//! expensive memory-pruning action is gated to run at most once per
//! (agent, user) pair within a rolling window.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and port traits
//! - **Service Layer** (`services`): resolver, prune gate, registry
//!   service, invocation orchestrator
//! - **Infrastructure Layer** (`infrastructure`): cache backends,
//!   SQLite persistence, configuration, logging, process lifecycle
//! - **CLI Layer** (`cli`): command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AgentConfiguration, AgentEntity, AgentPatch, AgentSummary, Config, ExecutionResult,
    KnowledgeParams, ModelBackend, NewAgent, PruneLedgerEntry, ToolEntity,
};
pub use domain::ports::{
    AgentInvocation, AgentRepository, AgentRunner, CacheBackend, CacheError, MemoryStore,
    RunnerError, RunnerOutput, UserMemory,
};
pub use infrastructure::cache::{CacheManager, InMemoryCacheBackend};
pub use infrastructure::config::ConfigLoader;
pub use infrastructure::database::SqliteAgentRepository;
pub use infrastructure::AppContext;
pub use services::{AgentConfigResolver, AgentService, ExecutionOrchestrator, MemoryPruneGate};
