//! Periodic watcher that reports repositories whose build state changed.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use clap::Args;

use crate::infra::github::{ActionsClient, GitHubApi, RunFilter};
use crate::shared::config::Config;
use crate::shared::poll::{Tick, Ticker};
use crate::shared::time::format_local;

use super::error::Result;
use super::format::{OutputFormat, RunCounts, format_json, format_one_line, format_run_list};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct WatchArgs {
    /// Comma-separated repository aliases (default: monitor.watch_repositories)
    #[arg(long, value_delimiter = ',')]
    pub repos: Option<Vec<String>>,

    /// Seconds between checks (default: monitor.watch_interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Only report repositories with failed builds
    #[arg(long)]
    pub notify_failures: bool,

    /// Stop after this many checks
    #[arg(long)]
    pub max_checks: Option<u32>,
}

/// Tracks the last counts per repository between checks.
pub(crate) struct Watcher {
    format: OutputFormat,
    notify_failures: bool,
    run_limit: u32,
    last: HashMap<String, RunCounts>,
}

impl Watcher {
    pub(crate) fn new(format: OutputFormat, notify_failures: bool, run_limit: u32) -> Self {
        Self {
            format,
            notify_failures,
            run_limit,
            last: HashMap::new(),
        }
    }

    /// Whether a repository with `counts` should be reported on this check.
    fn should_display(&self, alias: &str, counts: &RunCounts) -> bool {
        let changed = self
            .last
            .get(alias)
            .is_none_or(|previous| counts.differs_from(previous));

        if self.notify_failures {
            counts.failed > 0
        } else {
            changed
        }
    }

    /// Check one repository, returning the text to display if any.
    pub(crate) async fn check<C: ActionsClient + ?Sized>(
        &mut self,
        client: &C,
        owner: &str,
        name: &str,
        alias: &str,
    ) -> Result<Option<String>> {
        let filter = RunFilter::new(self.run_limit);
        let runs = client.list_workflow_runs(owner, name, &filter).await?;
        if runs.workflow_runs.is_empty() {
            return Ok(None);
        }

        let counts = RunCounts::from_runs(&runs.workflow_runs);
        let display = self.should_display(alias, &counts);
        self.last.insert(alias.to_string(), counts);
        if !display {
            return Ok(None);
        }

        let now = Utc::now();
        let text = match self.format {
            OutputFormat::Json => format_json(&runs.workflow_runs, alias, now)?,
            OutputFormat::Table => format!("\n{}", format_run_list(&runs.workflow_runs, alias, now)),
            OutputFormat::Summary => {
                format!(
                    "[{}] {}",
                    format_local(now),
                    format_one_line(&runs.workflow_runs, alias)
                )
            }
        };
        Ok(Some(text))
    }
}

pub async fn run_with_client<S>(
    args: &WatchArgs,
    config: &Config,
    client: &dyn GitHubApi,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()>,
{
    let repositories = args
        .repos
        .clone()
        .unwrap_or_else(|| config.monitor.watch_repositories.clone());
    let interval = args.interval.unwrap_or(config.monitor.watch_interval_secs);

    println!(
        "🚀 Starting periodic monitor for {} organization",
        config.github.organization
    );
    println!("📊 Repositories: {}", repositories.join(", "));
    println!("⏱️  Check interval: {interval} seconds");
    println!("📋 Format: {}", args.format.as_str());
    println!("🔔 Notify failures only: {}", args.notify_failures);
    if let Some(max) = args.max_checks {
        println!("🔢 Max checks: {max}");
    }
    println!("Press Ctrl+C to stop monitoring\n");

    let mut watcher = Watcher::new(
        args.format,
        args.notify_failures,
        config.monitor.watch_run_limit,
    );
    let mut ticker = Ticker::new(Duration::from_secs(interval), args.max_checks);
    tokio::pin!(shutdown);

    loop {
        match ticker.tick(shutdown.as_mut()).await {
            Tick::Check(n) => {
                println!("\n{}", "=".repeat(60));
                println!("🕐 Check #{n} - {}", format_local(Utc::now()));
                for alias in &repositories {
                    let repo = match config.resolve_repo(alias) {
                        Ok(repo) => repo,
                        Err(e) => {
                            println!("❌ Error checking {alias}: {e}");
                            tracing::warn!(alias, error = %e, "repository not resolvable");
                            continue;
                        }
                    };
                    match watcher.check(client, &repo.owner, &repo.name, alias).await {
                        Ok(Some(text)) => println!("{text}"),
                        Ok(None) => {}
                        Err(e) => {
                            println!("❌ Error checking {alias}: {e}");
                            tracing::warn!(%repo, error = %e, "watch check failed");
                        }
                    }
                }
            }
            Tick::Finished => {
                if let Some(max) = args.max_checks {
                    println!("\n✅ Reached maximum checks ({max}). Stopping.");
                }
                return Ok(());
            }
            Tick::Interrupted => {
                println!("\n👋 Stopping periodic monitor...");
                return Ok(());
            }
        }
    }
}
