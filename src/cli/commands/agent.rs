//! Agent CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::sync::Arc;

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{
    AgentConfiguration, AgentEntity, AgentPatch, KnowledgeParams, ModelBackend, NewAgent,
};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::AppContext;
use crate::services::{AgentConfigResolver, AgentService};

#[derive(Args, Debug)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommands,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Register a new agent
    Register {
        /// Agent name
        name: String,
        /// Agent description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Model backend (gemini, claude, openai, xai, ollama, groq, deepseek)
        #[arg(short, long)]
        model: String,
        /// Backend-specific model type string
        #[arg(short = 't', long)]
        model_type: String,
        /// Tool ids (repeatable)
        #[arg(long = "tool")]
        tools: Vec<i64>,
        /// Enable extended reasoning
        #[arg(long)]
        reasoning: bool,
        /// Free-text instructions
        #[arg(long)]
        instructions: Option<String>,
        /// Enable persistent conversational storage
        #[arg(long)]
        storage: bool,
        /// Knowledge collection name
        #[arg(long)]
        knowledge_collection: Option<String>,
        /// Knowledge base description
        #[arg(long, default_value = "")]
        knowledge_description: String,
        /// Chunks retrieved per knowledge query
        #[arg(long, default_value_t = 5)]
        knowledge_top_k: u32,
    },
    /// List agents
    List {
        /// Filter by name substring
        #[arg(short, long)]
        name: Option<String>,
        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Maximum rows returned
        #[arg(long, default_value_t = 100)]
        limit: i64,
    },
    /// Show an agent's resolved configuration
    Show {
        /// Agent id
        id: i64,
    },
    /// Update an agent
    Update {
        /// Agent id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        model_type: Option<String>,
        /// Replace the tool id list (repeatable)
        #[arg(long = "tool")]
        tools: Option<Vec<i64>>,
        #[arg(long)]
        reasoning: Option<bool>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        storage: Option<bool>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct AgentOutput {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub model_type: String,
    pub tools_count: usize,
    pub reasoning: bool,
    pub storage_enabled: bool,
}

impl From<&AgentEntity> for AgentOutput {
    fn from(agent: &AgentEntity) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            model: agent.model.as_str().to_string(),
            model_type: agent.model_type.clone(),
            tools_count: agent.tools.len(),
            reasoning: agent.reasoning,
            storage_enabled: agent.storage_enabled,
        }
    }
}

impl CommandOutput for AgentOutput {
    fn to_human(&self) -> String {
        format!(
            "Agent #{} '{}' ({} / {}), {} tool(s), reasoning: {}, storage: {}",
            self.id,
            self.name,
            self.model,
            self.model_type,
            self.tools_count,
            self.reasoning,
            self.storage_enabled,
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AgentListOutput {
    pub agents: Vec<AgentSummaryOutput>,
    pub total: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct AgentSummaryOutput {
    pub id: i64,
    pub name: String,
}

impl CommandOutput for AgentListOutput {
    fn to_human(&self) -> String {
        if self.agents.is_empty() {
            return "No agents found.".to_string();
        }

        let mut lines = vec![format!("Found {} agent(s):\n", self.total)];
        lines.push(format!("{:<8} {:<30}", "ID", "NAME"));
        lines.push("-".repeat(38));
        for agent in &self.agents {
            lines.push(format!("{:<8} {:<30}", agent.id, truncate(&agent.name, 30)));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AgentShowOutput {
    #[serde(flatten)]
    pub configuration: AgentConfiguration,
}

impl CommandOutput for AgentShowOutput {
    fn to_human(&self) -> String {
        let config = &self.configuration;
        let mut lines = vec![
            format!("Agent #{}: {}", config.id, config.name),
            format!("  model:        {} ({})", config.model, config.model_type),
            format!("  description:  {}", truncate(&config.description, 60)),
            format!("  tools:        {:?}", config.tool_ids),
            format!("  reasoning:    {}", config.reasoning),
            format!("  storage:      {}", config.storage_enabled),
        ];
        if let Some(ref instructions) = config.instructions {
            lines.push(format!("  instructions: {}", truncate(instructions, 60)));
        }
        if let Some(ref parser) = config.output_parser {
            lines.push(format!("  parser:       {parser}"));
        }
        if let Some(ref knowledge) = config.knowledge {
            lines.push(format!(
                "  knowledge:    {} (top {})",
                knowledge.collection, knowledge.top_k
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct NotFoundOutput {
    pub id: i64,
}

impl CommandOutput for NotFoundOutput {
    fn to_human(&self) -> String {
        format!("Agent {} not found.", self.id)
    }
}

pub async fn execute(args: AgentArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let context = AppContext::start(&config)
        .await
        .context("Failed to start application context")?;

    let repository = context.repository();
    let resolver = Arc::new(AgentConfigResolver::new(
        Arc::clone(&repository),
        context.cache(),
    ));
    let service = AgentService::new(repository, resolver);

    let result = run_command(args.command, &service, json_mode).await;
    context.shutdown().await;
    result
}

async fn run_command<R>(
    command: AgentCommands,
    service: &AgentService<R>,
    json_mode: bool,
) -> Result<()>
where
    R: crate::domain::ports::AgentRepository,
{
    match command {
        AgentCommands::Register {
            name,
            description,
            model,
            model_type,
            tools,
            reasoning,
            instructions,
            storage,
            knowledge_collection,
            knowledge_description,
            knowledge_top_k,
        } => {
            let draft = NewAgent {
                name,
                description,
                model: model.parse::<ModelBackend>()?,
                model_type,
                tool_ids: tools,
                reasoning,
                output_parser: None,
                instructions,
                storage_enabled: storage,
                knowledge: knowledge_collection.map(|collection| KnowledgeParams {
                    collection,
                    description: knowledge_description,
                    top_k: knowledge_top_k,
                }),
            };
            let entity = service.create_agent(&draft).await?;
            output(&AgentOutput::from(&entity), json_mode);
        }
        AgentCommands::List { name, offset, limit } => {
            let agents = service
                .get_all_agents(name.as_deref(), Some(offset), Some(limit))
                .await?;
            let listing = AgentListOutput {
                total: agents.len(),
                agents: agents
                    .into_iter()
                    .map(|a| AgentSummaryOutput { id: a.id, name: a.name })
                    .collect(),
            };
            output(&listing, json_mode);
        }
        AgentCommands::Show { id } => match service.get_agent_by_id(id).await? {
            Some(configuration) => output(&AgentShowOutput { configuration }, json_mode),
            None => output(&NotFoundOutput { id }, json_mode),
        },
        AgentCommands::Update {
            id,
            name,
            description,
            model,
            model_type,
            tools,
            reasoning,
            instructions,
            storage,
        } => {
            let patch = AgentPatch {
                name,
                description,
                model: model.map(|m| m.parse::<ModelBackend>()).transpose()?,
                model_type,
                tool_ids: tools,
                reasoning,
                output_parser: None,
                instructions,
                storage_enabled: storage,
                knowledge: None,
            };
            match service.update_agent(id, &patch).await? {
                Some(entity) => output(&AgentOutput::from(&entity), json_mode),
                None => output(&NotFoundOutput { id }, json_mode),
            }
        }
    }
    Ok(())
}
