use anyhow::{Context, Result};
use std::process::ExitCode;
use toolbelt::cli::commands;
use toolbelt::cli::output::Output;
use toolbelt::cli::{Cli, Commands};
use toolbelt::utils::logging::init_logging;
use toolbelt::{ToolContext, ToolRegistry, ToolbeltConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = output_for(cli.no_color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ToolbeltConfig::load(&cli.config).context("Failed to load configuration")?;
    init_logging(&config.log_level, cli.verbose);
    tracing::debug!(config = %config.path.display(), chains = ?config.chains, "Loaded configuration");

    let output = output_for(cli.no_color);

    match cli.command {
        Commands::Setup => commands::setup(&config, &output.on_stderr()),
        Commands::List => commands::list(&build_registry(&config)?, &output),
        Commands::Info { name } => commands::info(&build_registry(&config)?, &name, &output)?,
        Commands::Call { name, args } => {
            let call = commands::parse_call(&name, &args)?;
            let registry = build_registry(&config)?;
            let ctx = ToolContext::from_config(&config);
            commands::call(&registry, &ctx, call, &output).await?;
        }
    }

    Ok(())
}

fn build_registry(config: &ToolbeltConfig) -> Result<ToolRegistry> {
    ToolRegistry::from_config(config).context("Failed to build tool registry")
}

fn output_for(no_color: bool) -> Output {
    if no_color {
        Output::no_color()
    } else {
        Output::new()
    }
}
