//! Build status across configured repositories.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use clap::Args;

use crate::infra::github::{GitHubApi, RunFilter, list_runs_with_fallback};
use crate::shared::config::Config;
use crate::shared::poll::{Tick, Ticker};
use crate::shared::time::format_local;

use super::error::Result;
use super::format::{OutputFormat, render};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct StatusArgs {
    /// Repository alias to check (default: every configured repository)
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to check
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Specific workflow file to check
    #[arg(long)]
    pub workflow: Option<String>,

    /// Number of recent runs per workflow, 1-100 (default: monitor.run_limit)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Keep checking until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Seconds between checks in watch mode (default: monitor.interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
}

/// What one repository check observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RepoCheck {
    Inaccessible,
    NoWorkflows,
    Checked {
        with_runs: usize,
        without_runs: usize,
        errors: usize,
    },
}

fn selected_repositories(args: &StatusArgs, config: &Config) -> Vec<String> {
    match &args.repo {
        Some(alias) => vec![alias.clone()],
        None => config.repositories.keys().cloned().collect(),
    }
}

pub(crate) async fn check_repository(
    client: &dyn GitHubApi,
    config: &Config,
    args: &StatusArgs,
    alias: &str,
) -> Result<RepoCheck> {
    println!("\n🔍 Checking {alias} repository...");
    let repo = match config.resolve_repo(alias) {
        Ok(repo) => repo,
        Err(e) => {
            println!("❌ Cannot resolve repository {alias}: {e}");
            tracing::warn!(alias, error = %e, "repository not resolvable");
            return Ok(RepoCheck::Inaccessible);
        }
    };

    if let Err(e) = client.get_repo(&repo.owner, &repo.name).await {
        println!("❌ Cannot access repository {alias}: {e}");
        tracing::warn!(%repo, error = %e, "repository not accessible");
        return Ok(RepoCheck::Inaccessible);
    }
    println!("✅ Repository {alias} is accessible");

    let workflows: Vec<String> = match &args.workflow {
        Some(workflow) => vec![workflow.clone()],
        None => config.workflows_for(alias).to_vec(),
    };
    if workflows.is_empty() {
        println!("⚠️  No workflows configured for {alias}");
        return Ok(RepoCheck::NoWorkflows);
    }

    let limit = args.limit.unwrap_or(config.monitor.run_limit);
    let (mut with_runs, mut without_runs, mut errors) = (0, 0, 0);
    for workflow in &workflows {
        let filter = RunFilter::new(limit)
            .workflow(workflow)
            .branch(&args.branch);
        match list_runs_with_fallback(client, &repo.owner, &repo.name, &filter).await {
            Ok(runs) if !runs.workflow_runs.is_empty() => {
                with_runs += 1;
                println!("\n📋 Workflow: {workflow}");
                println!("{}", render(args.format, &runs.workflow_runs, alias)?);
            }
            Ok(_) => {
                without_runs += 1;
                println!("📋 Workflow: {workflow} - No recent runs");
            }
            Err(e) => {
                errors += 1;
                println!("❌ Error checking workflow {workflow}: {e}");
                tracing::warn!(%repo, workflow, error = %e, "workflow check failed");
            }
        }
    }

    Ok(RepoCheck::Checked {
        with_runs,
        without_runs,
        errors,
    })
}

async fn check_all(
    client: &dyn GitHubApi,
    config: &Config,
    args: &StatusArgs,
    repositories: &[String],
) -> Result<Vec<RepoCheck>> {
    let mut checks = Vec::with_capacity(repositories.len());
    for alias in repositories {
        checks.push(check_repository(client, config, args, alias).await?);
    }

    let (mut with_runs, mut without_runs, mut errors, mut skipped) = (0, 0, 0, 0);
    for check in &checks {
        match check {
            RepoCheck::Checked {
                with_runs: w,
                without_runs: wo,
                errors: e,
            } => {
                with_runs += w;
                without_runs += wo;
                errors += e;
            }
            RepoCheck::Inaccessible | RepoCheck::NoWorkflows => skipped += 1,
        }
    }
    tracing::info!(with_runs, without_runs, errors, skipped, "build check finished");
    Ok(checks)
}

/// Check builds once, or repeatedly until `shutdown` resolves with `--watch`.
pub async fn run_with_client<S>(
    args: &StatusArgs,
    config: &Config,
    client: &dyn GitHubApi,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()>,
{
    let repositories = selected_repositories(args, config);
    println!(
        "🚀 Starting build monitor for {} organization",
        config.github.organization
    );
    println!("📊 Repositories: {}", repositories.join(", "));
    println!(
        "🔄 Watch mode: {}",
        if args.watch { "enabled" } else { "disabled" }
    );

    if !args.watch {
        check_all(client, config, args, &repositories).await?;
        return Ok(());
    }

    let interval = args.interval.unwrap_or(config.monitor.interval_secs);
    println!("⏱️  Check interval: {interval} seconds");
    println!("Press Ctrl+C to stop monitoring\n");

    let mut ticker = Ticker::new(Duration::from_secs(interval), None);
    tokio::pin!(shutdown);
    loop {
        match ticker.tick(shutdown.as_mut()).await {
            Tick::Check(n) => {
                if n > 1 {
                    println!("\n{}", "=".repeat(60));
                    println!("🕐 {} - Checking builds...", format_local(Utc::now()));
                }
                check_all(client, config, args, &repositories).await?;
            }
            Tick::Interrupted | Tick::Finished => {
                println!("\n👋 Stopping build monitor...");
                return Ok(());
            }
        }
    }
}
