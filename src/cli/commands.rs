//! Subcommand handlers.

use crate::cli::output::Output;
use crate::tools::{self, chains, Tool, ToolContext, ToolRegistry};
use crate::types::{AppError, Result, ToolCall};
use crate::utils::config::ToolbeltConfig;
use serde_json::Value;
use tracing::debug;

/// `toolbelt list`
pub fn list(registry: &ToolRegistry, output: &Output) {
    for definition in registry.get_tool_definitions() {
        output.tool(&definition.name, &definition.description);
    }
}

/// `toolbelt info <name>`. Nothing is printed unless the tool exists.
pub fn info(registry: &ToolRegistry, name: &str, output: &Output) -> Result<()> {
    let definition = registry.get(name)?.to_definition();
    let value = serde_json::to_value(&definition)
        .map_err(|e| AppError::Parse(format!("failed to serialize definition: {}", e)))?;
    print_json(output, &value)
}

/// Turn the raw `--args` string into a [`ToolCall`].
pub fn parse_call(name: &str, raw_args: &str) -> Result<ToolCall> {
    let arguments: Value = serde_json::from_str(raw_args)
        .map_err(|e| AppError::InvalidArgument(format!("--args is not valid JSON: {}", e)))?;
    Ok(ToolCall {
        name: name.to_string(),
        arguments,
    })
}

/// `toolbelt call <name> --args <json>`
pub async fn call(
    registry: &ToolRegistry,
    ctx: &ToolContext,
    call: ToolCall,
    output: &Output,
) -> Result<()> {
    debug!(tool = %call.name, "Dispatching tool call");
    let result = registry.execute(&call.name, ctx, call.arguments).await?;
    print_json(output, &result)
}

fn print_json(output: &Output, value: &Value) -> Result<()> {
    output
        .json(value)
        .map_err(|e| AppError::Parse(format!("failed to render JSON: {}", e)))
}

/// `toolbelt setup`. Writes only to `output`, which the binary points at stderr.
pub fn setup(config: &ToolbeltConfig, output: &Output) {
    output.header("Toolbelt configuration");

    let file_state = if config.path.exists() {
        "found"
    } else {
        "not found, using defaults"
    };
    output.kv(
        "config file",
        &format!("{} ({})", config.path.display(), file_state),
    );
    let chain_names: Vec<String> = config
        .chains
        .iter()
        .map(|id| format!("{} ({})", chains::get_chain_name(*id), id))
        .collect();
    output.kv("chains", &chain_names.join(", "));
    output.kv("log level", &config.log_level);

    output.subheader("Credentials");
    for entry in &config.entries {
        let detail = match &entry.source {
            Some(source) => format!("set ({})", source),
            None if entry.key.is_required() => "not set".to_string(),
            None => "not set (optional)".to_string(),
        };
        output.status(entry.name(), entry.is_set(), &detail, entry.description);
    }

    output.subheader("Tool collections");
    let mut skipped = 0;
    for (label, built) in tools::all_collections(&config.credentials) {
        match built {
            Ok(collection) => output.list_item(&format!("{}: {} tools", label, collection.len())),
            Err(e) => {
                skipped += 1;
                output.list_item(&format!("{}: skipped ({})", label, e));
            }
        }
    }

    if skipped > 0 {
        output.hint("Set the missing credentials in the environment, .env or the [credentials] table");
    }
    for id in &config.chains {
        if chains::chain_by_id(*id).is_none() {
            output.warning(&format!("chain {} is not in the known chain table", id));
        }
    }
}
