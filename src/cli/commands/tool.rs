//! Tool registry CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::ToolEntity;
use crate::domain::ports::AgentRepository;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::AppContext;

#[derive(Args, Debug)]
pub struct ToolArgs {
    #[command(subcommand)]
    pub command: ToolCommands,
}

#[derive(Subcommand, Debug)]
pub enum ToolCommands {
    /// Register a tool
    Add {
        /// Tool name
        name: String,
        /// Tool description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List registered tools
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct ToolOutput {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<ToolEntity> for ToolOutput {
    fn from(tool: ToolEntity) -> Self {
        Self { id: tool.id, name: tool.name, description: tool.description }
    }
}

impl CommandOutput for ToolOutput {
    fn to_human(&self) -> String {
        format!("Tool #{}: {}", self.id, self.name)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ToolListOutput {
    pub tools: Vec<ToolOutput>,
    pub total: usize,
}

impl CommandOutput for ToolListOutput {
    fn to_human(&self) -> String {
        if self.tools.is_empty() {
            return "No tools registered.".to_string();
        }

        let mut lines = vec![format!("Found {} tool(s):\n", self.total)];
        lines.push(format!("{:<8} {:<20} {:<40}", "ID", "NAME", "DESCRIPTION"));
        lines.push("-".repeat(68));
        for tool in &self.tools {
            lines.push(format!(
                "{:<8} {:<20} {:<40}",
                tool.id,
                truncate(&tool.name, 20),
                truncate(&tool.description, 40)
            ));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: ToolArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let context = AppContext::start(&config)
        .await
        .context("Failed to start application context")?;
    let repository = context.repository();

    let result = match args.command {
        ToolCommands::Add { name, description } => {
            match repository.create_tool(&name, &description).await {
                Ok(tool) => {
                    output(&ToolOutput::from(tool), json_mode);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        ToolCommands::List => match repository.get_all_tools().await {
            Ok(tools) => {
                let listing = ToolListOutput {
                    total: tools.len(),
                    tools: tools.into_iter().map(Into::into).collect(),
                };
                output(&listing, json_mode);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    context.shutdown().await;
    result
}
