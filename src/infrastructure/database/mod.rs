//! SQLite persistence: pool management, migrations, repositories.

pub mod agent_repository;
pub mod connection;
pub mod migrations;

pub use agent_repository::SqliteAgentRepository;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{initialize_database, Migration, MigrationError, Migrator};
