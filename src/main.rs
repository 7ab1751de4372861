mod cli;
mod commands;
mod infra;
mod shared;

use clap::Parser;
use cli::{Cli, Commands};

use crate::shared::config::load_config;
use crate::shared::env_var::EnvVars;
use crate::shared::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { config, command } = Cli::parse();

    let env = EnvVars::load();
    let _log_guard = logging::init(&env);

    if let Commands::Completions { shell } = command {
        cli::print_completions(shell);
        return Ok(());
    }

    let mut config = load_config(config.as_deref())?;
    config.apply_env(&env);

    match command {
        Commands::Builds(cmd) => cmd.run(&config).await?,
        Commands::Access(cmd) => cmd.run(&config).await?,
        Commands::Org(cmd) => cmd.run(&config).await?,
        Commands::Config(cmd) => cmd.run(&config)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
