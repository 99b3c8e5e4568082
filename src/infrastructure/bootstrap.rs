//! Process-wide resource lifecycle.
//!
//! Builds the database pool and cache manager once at startup and
//! tears them down at shutdown. Components receive these resources by
//! injection; nothing here is reachable through a global.

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::Config;
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::database::{
    create_pool, initialize_database, ConnectionError, MigrationError, PoolConfig,
    SqliteAgentRepository,
};

/// Startup error types.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Database migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("Cache startup failed: {0}")]
    Cache(#[from] crate::domain::ports::CacheError),
}

/// Live process resources, constructed by [`AppContext::start`].
pub struct AppContext {
    pool: SqlitePool,
    cache: Arc<CacheManager>,
    repository: Arc<SqliteAgentRepository>,
}

impl AppContext {
    /// Connect the pool, apply migrations, and start the cache.
    pub async fn start(config: &Config) -> Result<Self, BootstrapError> {
        let database_url = format!("sqlite:{}", config.database.path);
        let pool_config = PoolConfig {
            max_connections: config.database.max_connections,
            ..PoolConfig::default()
        };

        let pool = create_pool(&database_url, Some(pool_config)).await?;
        let applied = initialize_database(&pool).await?;
        if applied > 0 {
            info!(applied, "applied database migrations");
        }

        let cache = Arc::new(CacheManager::from_config(&config.cache));
        cache.connect().await?;

        let repository = Arc::new(SqliteAgentRepository::new(pool.clone()));

        Ok(Self { pool, cache, repository })
    }

    pub fn cache(&self) -> Arc<CacheManager> {
        Arc::clone(&self.cache)
    }

    pub fn repository(&self) -> Arc<SqliteAgentRepository> {
        Arc::clone(&self.repository)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Stop the cache sweeper and close the pool.
    pub async fn shutdown(self) {
        if let Err(e) = self.cache.disconnect().await {
            tracing::warn!(error = %e, "cache disconnect failed during shutdown");
        }
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: crate::domain::models::DatabaseConfig {
                path: dir.path().join("agentry.db").to_string_lossy().into_owned(),
                ..Default::default()
            },
            ..Default::default()
        };

        let context = AppContext::start(&config).await.unwrap();
        assert!(!context.pool().is_closed());

        // Schema is in place.
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE name = 'agents'")
                .fetch_one(context.pool())
                .await
                .unwrap();
        assert_eq!(count.0, 1);

        context.shutdown().await;
    }
}
