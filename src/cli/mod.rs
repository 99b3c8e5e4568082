//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "agentry", about = "Agent registry and invocation backend", version)]
pub struct Cli {
    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the project directory and database
    Init(commands::init::InitArgs),
    /// Manage agents
    Agent(commands::agent::AgentArgs),
    /// Manage the tool registry
    Tool(commands::tool::ToolArgs),
}

/// Render a command error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    if json_mode {
        let payload = serde_json::json!({ "success": false, "error": err.to_string() });
        eprintln!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
