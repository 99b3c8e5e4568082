//! Service layer: business logic coordination.

pub mod agent_service;
pub mod config_resolver;
pub mod orchestrator;
pub mod prune_gate;

pub use agent_service::AgentService;
pub use config_resolver::AgentConfigResolver;
pub use orchestrator::ExecutionOrchestrator;
pub use prune_gate::{MemoryPruneGate, DEFAULT_PRUNE_WINDOW};
