//! Dispatch a workflow and follow the run it starts.

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::{Map, Value};

use crate::infra::github::models::{Conclusion, WorkflowRun};
use crate::infra::github::{GitHubApi, RunFilter, list_runs_with_fallback};
use crate::shared::config::{Config, RepoRef};
use crate::shared::poll::{PollConfig, PollError, poll_until};

use super::error::{BuildsError, Result};
use super::wait::{completion_poll, wait_for_completion};

/// Runs created this long before the dispatch still count as ours.
const CLOCK_SKEW_SECS: i64 = 10;
/// Recent runs inspected while looking for the dispatched one.
const START_SEARCH_LIMIT: u32 = 5;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct TriggerArgs {
    /// Repository alias, name, or owner/repo
    pub repo: String,

    /// Workflow file name (e.g. ci.yml) or ID
    pub workflow: String,

    /// Branch or tag to run on
    #[arg(default_value = "main")]
    pub branch: String,

    /// Workflow inputs as a JSON object
    #[arg(default_value = "{}")]
    pub inputs: String,

    /// Polling interval in seconds (default: wait.interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Completion timeout in seconds (default: wait.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Parse workflow inputs. Anything other than a JSON object is rejected.
pub fn parse_inputs(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(BuildsError::InvalidInputs(raw.to_string()).into()),
    }
}

fn created_after(run: &WorkflowRun, dispatched_at: DateTime<Utc>) -> bool {
    run.created_at >= dispatched_at - chrono::Duration::seconds(CLOCK_SKEW_SECS)
}

/// Find the run started by a dispatch at `dispatched_at`, falling back to the
/// latest run when none shows up in time.
async fn find_dispatched_run(
    client: &dyn GitHubApi,
    repo: &RepoRef,
    filter: &RunFilter,
    dispatched_at: DateTime<Utc>,
    search: &PollConfig,
) -> Result<Option<WorkflowRun>> {
    let found = poll_until(
        search,
        "the dispatched run to start",
        move || async move {
            let runs = list_runs_with_fallback(client, &repo.owner, &repo.name, filter).await?;
            Ok(runs
                .workflow_runs
                .into_iter()
                .find(|run| created_after(run, dispatched_at)))
        },
        Option::is_some,
        |_| {},
    )
    .await;

    match found {
        Ok(run) => Ok(run),
        Err(e) if e.downcast_ref::<PollError>().is_some() => {
            println!("⚠️  No new run detected, using the latest run");
            tracing::warn!(%repo, "dispatched run not found, falling back to latest");
            let runs = list_runs_with_fallback(client, &repo.owner, &repo.name, filter).await?;
            Ok(runs.workflow_runs.into_iter().next())
        }
        Err(e) => Err(e),
    }
}

pub async fn run_with_client(
    args: &TriggerArgs,
    config: &Config,
    client: &dyn GitHubApi,
) -> Result<()> {
    let inputs = parse_inputs(&args.inputs)?;
    let repo = config.resolve_repo(&args.repo)?;

    println!("🚀 Triggering workflow: {} on {}", args.workflow, args.branch);
    println!("📋 Inputs: {}", Value::Object(inputs.clone()));
    let dispatched_at = Utc::now();
    client
        .dispatch_workflow(&repo.owner, &repo.name, &args.workflow, &args.branch, &inputs)
        .await?;
    println!("✅ Successfully triggered workflow: {}", args.workflow);
    tracing::info!(%repo, workflow = %args.workflow, branch = %args.branch, "workflow dispatched");

    println!("⏳ Waiting for workflow to start...");
    tokio::time::sleep(Duration::from_secs(config.wait.start_delay_secs)).await;

    let filter = RunFilter::new(START_SEARCH_LIMIT)
        .workflow(&args.workflow)
        .branch(&args.branch);
    let search = PollConfig::from_secs(config.wait.interval_secs, config.wait.start_timeout_secs);
    let Some(run) = find_dispatched_run(client, &repo, &filter, dispatched_at, &search).await?
    else {
        println!("⚠️  No workflow runs found for {}", args.workflow);
        return Ok(());
    };

    println!("📋 Latest run ID: {}", run.id);
    println!("📋 Status: {}", run.status);
    println!("📋 Created: {}", run.created_at.to_rfc3339());

    let poll = completion_poll(&config.wait, args.interval, args.timeout);
    let result = match wait_for_completion(client, &repo, run.id, &poll, true).await {
        Ok(result) => result,
        Err(e) if e.downcast_ref::<PollError>().is_some() => {
            println!("⚠️  Could not wait for completion: {e}");
            println!("🔗 Check status at: {}", run.html_url);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("🎉 Workflow completed!");
    println!("📊 Result: {}", result.conclusion_str());
    println!("🔗 URL: {}", result.html_url);
    if result.conclusion == Some(Conclusion::Success) {
        println!("✅ Build successful!");
    } else {
        println!("❌ Build failed: {}", result.conclusion_str());
    }
    Ok(())
}
