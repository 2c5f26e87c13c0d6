//! Shared client context passed to every tool execution.

use crate::utils::config::{Credentials, ToolbeltConfig};

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("toolbelt/", env!("CARGO_PKG_VERSION"));

/// Read-only state shared by all tool executions.
///
/// Cloning is cheap: `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Chain ids the caller has configured.
    pub chains: Vec<u64>,
    /// HTTP client used for all outbound calls.
    pub http: reqwest::Client,
    /// Resolved credentials.
    pub credentials: Credentials,
}

impl ToolContext {
    pub fn new(chains: Vec<u64>, credentials: Credentials) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            chains,
            http,
            credentials,
        }
    }

    pub fn from_config(config: &ToolbeltConfig) -> Self {
        Self::new(config.chains.clone(), config.credentials.clone())
    }

    pub fn has_chain(&self, chain_id: u64) -> bool {
        self.chains.contains(&chain_id)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(vec![1], Credentials::default())
    }
}
