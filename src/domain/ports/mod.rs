//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters must implement:
//! - AgentRepository: database operations for agents and tools
//! - CacheBackend: key/value cache with per-entry expiry
//! - AgentRunner / MemoryStore: opaque agent execution engine
//!
//! These contracts keep the services independent of specific
//! infrastructure implementations.

pub mod agent_repository;
pub mod agent_runner;
pub mod cache_store;

pub use agent_repository::AgentRepository;
pub use agent_runner::{
    AgentInvocation, AgentRunner, MemoryStore, RunnerError, RunnerOutput, UserMemory,
};
pub use cache_store::{CacheBackend, CacheError, CacheResult};
