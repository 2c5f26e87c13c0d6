use serde::{Deserialize, Serialize};

// ============= Tool Types =============

/// Serialisable description of a tool, as handed to an LLM for function calling
/// and printed by `toolbelt info`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_chains: Option<Vec<u64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{provider} request failed ({status}): {detail}")]
    Provider {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown tool '{name}'. Available tools: {}", available.join(", "))]
    UnknownTool { name: String, available: Vec<String> },

    #[error("Network error: {0}")]
    Network(String),
}

impl AppError {
    /// Short machine-friendly label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::InvalidArgument(_) => "argument",
            AppError::Provider { .. } => "provider",
            AppError::Parse(_) => "parse",
            AppError::UnknownTool { .. } => "unknown_tool",
            AppError::Network(_) => "network",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
