//! Implementation of the `agentry init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::database::{create_pool, initialize_database};

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Agentry configuration
# Override settings by editing this file or setting environment
# variables with an AGENTRY_ prefix, e.g.:
#   export AGENTRY_DATABASE__PATH=/custom/path/agentry.db
#   export AGENTRY_CACHE__TTL_SECS=300
#   export AGENTRY_LOGGING__LEVEL=debug

database:
  # Path to the SQLite database file (project-local)
  path: ".agentry/agentry.db"

  # Maximum number of database connections in the pool
  max_connections: 5

cache:
  # Default entry TTL in seconds; omit for entries that never expire
  # ttl_secs: 300

  # Seconds between background expiry sweeps
  cleanup_interval_secs: 5

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "pretty"
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_file: PathBuf,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.success {
            lines.push(format!("Config written to {}", self.config_file.display()));
        }
        if self.database_initialized {
            lines.push("Database initialized".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let config_dir = target_path.join(".agentry");
    let config_file = config_dir.join("config.yaml");

    if config_file.exists() && !args.force {
        output(
            &InitOutput {
                success: false,
                message: "Project already initialized. Use --force to reinitialize.".to_string(),
                config_file,
                database_initialized: false,
            },
            json_mode,
        );
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    std::fs::write(&config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;

    let database_url = format!("sqlite:{}", config_dir.join("agentry.db").display());
    let pool = create_pool(&database_url, None)
        .await
        .context("Failed to create database")?;
    initialize_database(&pool)
        .await
        .context("Failed to run migrations")?;
    pool.close().await;

    output(
        &InitOutput {
            success: true,
            message: "Initialized agentry project.".to_string(),
            config_file,
            database_initialized: true,
        },
        json_mode,
    );
    Ok(())
}
