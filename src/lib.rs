//! # Toolbelt
//!
//! Crypto market data, on-chain and web tools exposed through one uniform,
//! LLM-friendly interface.
//!
//! Each tool is a named unit of work with a JSON Schema describing its
//! arguments. Tools are grouped in collections, one per upstream provider,
//! and a [`ToolRegistry`] gives name-based lookup, execution and listing for
//! an agent runtime or the `toolbelt` CLI.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use serde_json::json;
//! use toolbelt::{ToolContext, ToolRegistry, ToolbeltConfig};
//!
//! #[tokio::main]
//! async fn main() -> toolbelt::Result<()> {
//!     let config = ToolbeltConfig::load("toolbelt.toml")?;
//!     let registry = ToolRegistry::from_config(&config)?;
//!     let ctx = ToolContext::from_config(&config);
//!
//!     let fng = registry
//!         .execute("get_fear_greed_index", &ctx, json!({"limit": 7}))
//!         .await?;
//!     println!("{}", fng["current"]["classification"]);
//!     Ok(())
//! }
//! ```
//!
//! ### Function Calling
//!
//! ```rust,ignore
//! // Hand these to the model as its tool list
//! let definitions = registry.get_tool_definitions();
//!
//! // Or only the tools that make sense on Base
//! let base_tools = registry.tools_for_chain(8453);
//! ```
//!
//! ## Modules
//!
//! - [`tools`] - the tool trait, registry and every provider collection
//! - [`types`] - tool definitions and error handling
//! - [`utils`] - configuration and logging
//! - [`cli`] - argument parsing and terminal output for the binary
//!
//! ## Configuration
//!
//! Credentials come from the environment (a `.env` file is loaded first) and
//! then from the `[credentials]` table of `toolbelt.toml`. Collections whose
//! credentials are missing are skipped; the rest keep working.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface for the `toolbelt` binary.
pub mod cli;
/// Tool trait, registry and provider collections.
pub mod tools;
/// Core types (tool definitions, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use tools::{Tool, ToolCollection, ToolContext, ToolRegistry};
pub use types::{AppError, Result, ToolDefinition};
pub use utils::config::{CredentialKey, Credentials, ToolbeltConfig};
