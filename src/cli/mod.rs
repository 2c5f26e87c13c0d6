//! CLI module for Toolbelt
//!
//! Provides command-line interface parsing and handling for the toolbelt binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use crate::utils::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toolbelt - crypto and web tools for LLM agents
///
/// Lists, inspects and runs the tools an agent runtime would call.
#[derive(Parser, Debug)]
#[command(
    name = "toolbelt",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Toolbelt - crypto and web tools for LLM agents",
    long_about = "Crypto market data, DeFi yields, swap quotes, image generation, IPFS pinning\n\
                  and web scraping tools behind one schema-validated interface.\n\n\
                  Credentials are read from the environment, a .env file, or the\n\
                  [credentials] table of the config file.",
    after_help = "EXAMPLES:\n    \
                  toolbelt list                                   # List configured tools\n    \
                  toolbelt info coingecko_get_price               # Show a tool's schema\n    \
                  toolbelt call get_fear_greed_index --args '{\"limit\": 7}'\n    \
                  toolbelt setup                                  # Check which credentials are set"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every configured tool with its description
    List,

    /// Print a tool's definition (name, description, JSON Schema) as JSON
    Info {
        /// Name of the tool
        name: String,
    },

    /// Validate arguments and run a tool, printing the JSON result
    Call {
        /// Name of the tool
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Report which credentials are set and where they came from
    ///
    /// The report goes to stderr; the exit code is always 0.
    Setup,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_call_defaults_to_empty_args() {
        let cli = Cli::try_parse_from(["toolbelt", "call", "get_supported_chains"]).unwrap();
        match cli.command {
            Commands::Call { name, args } => {
                assert_eq!(name, "get_supported_chains");
                assert_eq!(args, "{}");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("toolbelt.toml"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["toolbelt", "list", "--no-color", "-c", "other.toml"]).unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["toolbelt"]).is_err());
    }
}
