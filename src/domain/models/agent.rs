//! Agent domain models.
//!
//! An agent pairs a model backend with optional tools, free-text
//! instructions, persistent conversational storage, and knowledge
//! retrieval parameters. The repository owns the authoritative rows;
//! the resolver builds cache-friendly projections from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model backend selector.
///
/// Persisted as a stable integer code so rows written by earlier
/// deployments keep translating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    Gemini,
    Claude,
    OpenAi,
    XAi,
    Ollama,
    Groq,
    DeepSeek,
}

impl ModelBackend {
    /// Stable integer code used in the database.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Gemini => 1,
            Self::Claude => 2,
            Self::OpenAi => 3,
            Self::XAi => 4,
            Self::Ollama => 5,
            Self::Groq => 6,
            Self::DeepSeek => 7,
        }
    }

    /// Decode an integer code back into a backend selector.
    pub fn from_i64(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Gemini),
            2 => Some(Self::Claude),
            3 => Some(Self::OpenAi),
            4 => Some(Self::XAi),
            5 => Some(Self::Ollama),
            6 => Some(Self::Groq),
            7 => Some(Self::DeepSeek),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::OpenAi => "openai",
            Self::XAi => "xai",
            Self::Ollama => "ollama",
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "claude" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAi),
            "xai" => Ok(Self::XAi),
            "ollama" => Ok(Self::Ollama),
            "groq" => Ok(Self::Groq),
            "deepseek" => Ok(Self::DeepSeek),
            _ => Err(anyhow::anyhow!("Invalid model backend: {s}")),
        }
    }
}

/// A tool an agent may call during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntity {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Knowledge retrieval parameters attached to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeParams {
    /// Vector collection to search.
    pub collection: String,
    /// Human-readable description of the knowledge base.
    pub description: String,
    /// Number of chunks retrieved per query.
    pub top_k: u32,
}

/// Agent entity as stored by the repository, tools fanned out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEntity {
    pub id: i64,

    pub name: String,

    pub description: String,

    /// Model backend selector.
    pub model: ModelBackend,

    /// Backend-specific model type string (e.g. "claude-sonnet-4-5").
    pub model_type: String,

    /// Tools available to the agent, in declared order.
    pub tools: Vec<ToolEntity>,

    /// Whether extended reasoning is enabled.
    pub reasoning: bool,

    /// Optional output parser identifier.
    pub output_parser: Option<String>,

    /// Optional free-text instructions prepended to every run.
    pub instructions: Option<String>,

    /// Whether persistent conversational storage is enabled.
    pub storage_enabled: bool,

    /// Optional knowledge retrieval parameters.
    pub knowledge: Option<KnowledgeParams>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Listing projection: identifier and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: i64,
    pub name: String,
}

/// Draft for creating a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub model: ModelBackend,
    pub model_type: String,
    #[serde(default)]
    pub tool_ids: Vec<i64>,
    #[serde(default)]
    pub reasoning: bool,
    #[serde(default)]
    pub output_parser: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub storage_enabled: bool,
    #[serde(default)]
    pub knowledge: Option<KnowledgeParams>,
}

impl NewAgent {
    /// Minimal draft with required fields only.
    pub fn new(name: impl Into<String>, model: ModelBackend, model_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model,
            model_type: model_type.into(),
            tool_ids: vec![],
            reasoning: false,
            output_parser: None,
            instructions: None,
            storage_enabled: false,
            knowledge: None,
        }
    }

    /// Validate the draft before persisting.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("agent name cannot be empty".to_string());
        }
        if self.model_type.trim().is_empty() {
            return Err("model type cannot be empty".to_string());
        }
        if let Some(ref knowledge) = self.knowledge {
            if knowledge.collection.trim().is_empty() {
                return Err("knowledge collection cannot be empty".to_string());
            }
            if knowledge.top_k == 0 {
                return Err("knowledge top_k must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

/// Partial update of an agent. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub model: Option<ModelBackend>,
    pub model_type: Option<String>,
    pub tool_ids: Option<Vec<i64>>,
    pub reasoning: Option<bool>,
    pub output_parser: Option<String>,
    pub instructions: Option<String>,
    pub storage_enabled: Option<bool>,
    pub knowledge: Option<KnowledgeParams>,
}

impl AgentPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.model.is_none()
            && self.model_type.is_none()
            && self.tool_ids.is_none()
            && self.reasoning.is_none()
            && self.output_parser.is_none()
            && self.instructions.is_none()
            && self.storage_enabled.is_none()
            && self.knowledge.is_none()
    }

    /// Validate the fields that are present.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err("agent name cannot be empty".to_string());
            }
        }
        if let Some(ref model_type) = self.model_type {
            if model_type.trim().is_empty() {
                return Err("model type cannot be empty".to_string());
            }
        }
        if let Some(ref knowledge) = self.knowledge {
            if knowledge.top_k == 0 {
                return Err("knowledge top_k must be at least 1".to_string());
            }
        }
        Ok(())
    }
}
