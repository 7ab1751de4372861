//! GitHub Actions build monitoring commands.

mod adapt;
mod analysis;
mod analyze;
mod error;
mod format;
mod status;
mod trigger;
mod wait;
mod watch;

use clap::Subcommand;

use crate::infra::github::GitHubClient;
use crate::shared::config::Config;
use crate::shared::poll::ctrl_c;

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum BuildsCommands {
    /// Show recent workflow runs for configured repositories
    Status(status::StatusArgs),

    /// Periodically report repositories whose build state changed
    Watch(watch::WatchArgs),

    /// Dispatch a workflow and wait for the run it starts
    Trigger(trigger::TriggerArgs),

    /// Wait for a workflow run to complete; fails unless it succeeds
    Wait(wait::WaitArgs),

    /// Detailed analysis of a single workflow run
    Analyze(analyze::AnalyzeArgs),

    /// Analyze the latest run of a workflow and suggest fixes
    Adapt(adapt::AdaptArgs),
}

impl BuildsCommands {
    pub async fn run(&self, config: &Config) -> anyhow::Result<()> {
        let client = GitHubClient::from_config(config)?;
        match self {
            Self::Status(args) => status::run_with_client(args, config, &client, ctrl_c()).await,
            Self::Watch(args) => watch::run_with_client(args, config, &client, ctrl_c()).await,
            Self::Trigger(args) => {
                client.require_token()?;
                trigger::run_with_client(args, config, &client).await
            }
            Self::Wait(args) => wait::run_with_client(args, config, &client).await,
            Self::Analyze(args) => analyze::run_with_client(args, config, &client).await,
            Self::Adapt(args) => adapt::run_with_client(args, config, &client).await,
        }
    }
}
