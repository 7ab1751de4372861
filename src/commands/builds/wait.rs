//! Wait for an existing workflow run to complete.

use clap::Args;

use crate::infra::github::models::{Conclusion, WorkflowRun};
use crate::infra::github::{ActionsClient, GitHubApi};
use crate::shared::config::{Config, RepoRef, WaitConfig};
use crate::shared::poll::{PollConfig, poll_until};

use super::error::{BuildsError, Result};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct WaitArgs {
    /// Repository alias, name, or owner/repo
    pub repo: String,

    /// Workflow run ID
    pub run_id: u64,

    /// Polling interval in seconds (default: wait.interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Timeout in seconds (default: wait.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Completion poll settings, CLI flags taking precedence over the config.
pub(crate) fn completion_poll(
    wait: &WaitConfig,
    interval: Option<u64>,
    timeout: Option<u64>,
) -> PollConfig {
    PollConfig::from_secs(
        interval.unwrap_or(wait.interval_secs),
        timeout.unwrap_or(wait.timeout_secs),
    )
}

/// Poll a run until it reports `completed`.
///
/// With `verbose`, every observation is printed as
/// `Workflow run <id>: <status> (<conclusion>)`.
pub(crate) async fn wait_for_completion<C: ActionsClient + ?Sized>(
    client: &C,
    repo: &RepoRef,
    run_id: u64,
    poll: &PollConfig,
    verbose: bool,
) -> Result<WorkflowRun> {
    let run = poll_until(
        poll,
        &format!("workflow run {run_id}"),
        move || client.get_workflow_run(&repo.owner, &repo.name, run_id),
        |run: &WorkflowRun| run.status.is_completed(),
        |run: &WorkflowRun| {
            tracing::info!(run_id, status = %run.status, "observed workflow run");
            if verbose {
                println!(
                    "⏳ Workflow run {run_id}: {} ({})",
                    run.status,
                    run.conclusion.map_or("pending", |c| c.as_str())
                );
            }
        },
    )
    .await?;

    if verbose {
        println!(
            "✅ Workflow completed with conclusion: {}",
            run.conclusion_str()
        );
    }
    Ok(run)
}

pub async fn run_with_client(
    args: &WaitArgs,
    config: &Config,
    client: &dyn GitHubApi,
) -> Result<()> {
    let repo = config.resolve_repo(&args.repo)?;
    let poll = completion_poll(&config.wait, args.interval, args.timeout);

    println!("⏳ Waiting for workflow run {} in {repo}...", args.run_id);
    let run = wait_for_completion(client, &repo, args.run_id, &poll, true).await?;
    println!("🔗 URL: {}", run.html_url);

    if run.conclusion == Some(Conclusion::Success) {
        println!("✅ Build successful!");
        Ok(())
    } else {
        Err(BuildsError::RunNotSuccessful {
            id: run.id,
            conclusion: run.conclusion_str().to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::github::mock::GitHubMockServer;
    use crate::shared::poll::PollError;

    fn args(run_id: u64, timeout: u64) -> WaitArgs {
        WaitArgs {
            repo: "acme/dashboard".to_string(),
            run_id,
            interval: Some(0),
            timeout: Some(timeout),
        }
    }

    #[tokio::test]
    async fn waits_until_run_completes() {
        let mock = GitHubMockServer::start().await;
        let ctx = mock.repo("acme", "dashboard");
        ctx.run(42).status("in_progress").max_calls(2).get().await;
        ctx.run(42).status("completed").conclusion("success").get().await;

        run_with_client(&args(42, 10), &Config::default(), &mock.client())
            .await
            .unwrap();

        assert_eq!(
            mock.received("GET", "/repos/acme/dashboard/actions/runs/42").await,
            3
        );
    }

    #[tokio::test]
    async fn failed_run_is_an_error() {
        let mock = GitHubMockServer::start().await;
        mock.repo("acme", "dashboard")
            .run(7)
            .status("completed")
            .conclusion("failure")
            .get()
            .await;

        let err = run_with_client(&args(7, 10), &Config::default(), &mock.client())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildsError>(),
            Some(BuildsError::RunNotSuccessful { id: 7, conclusion }) if conclusion == "failure"
        ));
    }

    #[tokio::test]
    async fn zero_timeout_fails_without_request() {
        let mock = GitHubMockServer::start().await;
        mock.repo("acme", "dashboard")
            .run(7)
            .status("in_progress")
            .get()
            .await;

        let err = run_with_client(&args(7, 0), &Config::default(), &mock.client())
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<PollError>().is_some());
        assert_eq!(
            mock.received("GET", "/repos/acme/dashboard/actions/runs/7").await,
            0
        );
    }

    #[tokio::test]
    async fn missing_run_propagates_api_error() {
        let mock = GitHubMockServer::start().await;
        mock.repo("acme", "dashboard").run(5).get_not_found().await;

        let err = run_with_client(&args(5, 10), &Config::default(), &mock.client())
            .await
            .unwrap_err();

        assert!(crate::infra::github::is_not_found(&err));
    }

    #[test]
    fn completion_poll_prefers_flags() {
        let wait = WaitConfig::default();

        assert_eq!(
            completion_poll(&wait, None, None),
            PollConfig::from_secs(wait.interval_secs, wait.timeout_secs)
        );
        assert_eq!(
            completion_poll(&wait, Some(1), Some(2)),
            PollConfig::from_secs(1, 2)
        );
    }
}
