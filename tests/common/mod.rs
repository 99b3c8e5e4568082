//! Shared fixtures for integration tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use agentry::domain::ports::{
    AgentInvocation, AgentRunner, MemoryStore, RunnerError, RunnerOutput, UserMemory,
};
use agentry::infrastructure::database::{create_test_pool, initialize_database};
use agentry::{CacheManager, InMemoryCacheBackend, SqliteAgentRepository};

/// In-memory memory store backing the mock runner.
#[derive(Default)]
pub struct InMemoryMemoryStore {
    memories: Mutex<Vec<(String, UserMemory)>>,
}

impl InMemoryMemoryStore {
    pub async fn seed(&self, user_id: &str, memory_id: &str, memory: &str) {
        self.memories.lock().await.push((
            user_id.to_string(),
            UserMemory {
                memory_id: memory_id.to_string(),
                memory: memory.to_string(),
            },
        ));
    }

    pub async fn count_for(&self, user_id: &str) -> usize {
        self.memories
            .lock()
            .await
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .count()
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn get_user_memories(&self, user_id: &str) -> Result<Vec<UserMemory>, RunnerError> {
        Ok(self
            .memories
            .lock()
            .await
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, memory)| memory.clone())
            .collect())
    }

    async fn delete_user_memory(&self, memory_id: &str) -> Result<(), RunnerError> {
        // Deleting an absent memory is a no-op.
        self.memories
            .lock()
            .await
            .retain(|(_, memory)| memory.memory_id != memory_id);
        Ok(())
    }
}

/// Scripted runner: echoes the prompt, records every invocation, and
/// prunes its memory store when asked to.
pub struct MockRunner {
    pub memory: Arc<InMemoryMemoryStore>,
    invocations: Mutex<Vec<AgentInvocation>>,
    fail_with: Option<String>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            memory: Arc::new(InMemoryMemoryStore::default()),
            invocations: Mutex::new(vec![]),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            memory: Arc::new(InMemoryMemoryStore::default()),
            invocations: Mutex::new(vec![]),
            fail_with: Some(message.to_string()),
        }
    }

    pub async fn invocations(&self) -> Vec<AgentInvocation> {
        self.invocations.lock().await.clone()
    }
}

#[async_trait]
impl AgentRunner for MockRunner {
    async fn run(&self, invocation: AgentInvocation) -> Result<RunnerOutput, RunnerError> {
        if let Some(ref message) = self.fail_with {
            return Err(RunnerError::ExecutionFailed(message.clone()));
        }

        if invocation.prune_memories {
            for memory in self.memory.get_user_memories(&invocation.user_id).await? {
                self.memory.delete_user_memory(&memory.memory_id).await?;
            }
        }

        let output = RunnerOutput {
            content: format!("echo: {}", invocation.prompt),
            content_type: "text/plain".to_string(),
        };
        self.invocations.lock().await.push(invocation);
        Ok(output)
    }
}

/// Fresh migrated repository on an in-memory database.
pub async fn test_repository() -> Arc<SqliteAgentRepository> {
    let pool = create_test_pool().await.expect("failed to create pool");
    initialize_database(&pool).await.expect("failed to migrate");
    Arc::new(SqliteAgentRepository::new(pool))
}

/// Cache manager over a fresh in-memory backend.
pub fn test_cache() -> Arc<CacheManager> {
    Arc::new(CacheManager::new(Arc::new(InMemoryCacheBackend::new())))
}
