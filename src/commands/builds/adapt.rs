//! Analyze the latest run of a workflow and derive an adaptation plan.

use clap::Args;
use serde::Serialize;

use crate::infra::github::{Conclusion, GitHubApi, RunFilter, list_runs_with_fallback};
use crate::shared::config::{Config, RepoRef};
use crate::shared::poll::{PollConfig, PollError};

use super::analysis::{AdaptationPlan, AnalysisStatus, RunAnalysis};
use super::error::Result;
use super::wait::{completion_poll, wait_for_completion};

/// Recent runs fetched; the newest one is analyzed.
const RECENT_RUNS: u32 = 5;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct AdaptArgs {
    /// Repository alias, name, or owner/repo
    pub repo: String,

    /// Workflow file name
    #[arg(default_value = "ci.yml")]
    pub workflow: String,

    /// Branch
    #[arg(default_value = "main")]
    pub branch: String,

    /// Print the analysis and plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Analyze the newest run, waiting for it first if it is still active.
///
/// Never fails: fetch errors and timeouts become analysis statuses.
pub(crate) async fn analyze_latest(
    client: &dyn GitHubApi,
    repo: &RepoRef,
    workflow: &str,
    branch: &str,
    poll: &PollConfig,
) -> RunAnalysis {
    let filter = RunFilter::new(RECENT_RUNS).workflow(workflow).branch(branch);
    let runs = match list_runs_with_fallback(client, &repo.owner, &repo.name, &filter).await {
        Ok(runs) => runs,
        Err(e) => {
            tracing::warn!(%repo, workflow, error = %e, "could not list workflow runs");
            return RunAnalysis::without_run(AnalysisStatus::Error, e.to_string());
        }
    };
    let Some(latest) = runs.workflow_runs.into_iter().next() else {
        return RunAnalysis::without_run(AnalysisStatus::NoRuns, "No workflow runs found");
    };
    tracing::info!(%repo, run_id = latest.id, status = %latest.status, "analyzing latest run");

    let run = if latest.status.is_active() {
        match wait_for_completion(client, repo, latest.id, poll, false).await {
            Ok(run) => run,
            Err(e) if e.downcast_ref::<PollError>().is_some() => {
                tracing::warn!(%repo, run_id = latest.id, "timed out waiting for run");
                let mut analysis =
                    RunAnalysis::without_run(AnalysisStatus::Timeout, "Build timed out");
                analysis.run = Some((&latest).into());
                return analysis;
            }
            Err(e) => return RunAnalysis::without_run(AnalysisStatus::Error, e.to_string()),
        }
    } else {
        latest
    };

    let jobs = if run.conclusion == Some(Conclusion::Failure) {
        match client.list_run_jobs(&repo.owner, &repo.name, run.id).await {
            Ok(jobs) => Some(jobs.jobs),
            Err(e) => {
                tracing::warn!(%repo, run_id = run.id, error = %e, "could not list jobs");
                None
            }
        }
    } else {
        None
    };

    RunAnalysis::of_completed(&run, jobs.as_deref())
}

#[derive(Serialize)]
struct AdaptReport<'a> {
    analysis: &'a RunAnalysis,
    plan: &'a AdaptationPlan,
}

fn render_text(
    repo: &RepoRef,
    args: &AdaptArgs,
    analysis: &RunAnalysis,
    plan: &AdaptationPlan,
) -> Vec<String> {
    let mut lines = vec![
        format!("🚀 Starting build monitoring and adaptation for {repo}"),
        format!("📋 Workflow: {}", args.workflow),
        format!("🌿 Branch: {}", args.branch),
        "=====================================".to_string(),
    ];

    if let Some(run) = &analysis.run {
        lines.push(format!("📋 Latest run ID: {}", run.run_id));
        lines.push(format!("📋 Status: {}", run.status));
        lines.push(format!(
            "📋 Conclusion: {}",
            run.conclusion.map_or("pending", |c| c.as_str())
        ));
        lines.push(format!("📋 Created: {}", run.created_at.to_rfc3339()));
    }

    let outcome = &analysis.analysis;
    lines.push(String::new());
    lines.push("📊 Analysis Results:".to_string());
    lines.push("===================".to_string());
    lines.push(format!("Status: {}", outcome.status.as_str()));
    lines.push(format!("Message: {}", outcome.message));
    if let Some(recommendation) = &outcome.recommendation {
        lines.push(format!("Recommendation: {recommendation}"));
    }

    lines.push(String::new());
    lines.push("🔄 Adaptation Plan:".to_string());
    lines.push("==================".to_string());
    lines.push(format!("Action: {}", plan.action.as_str()));
    lines.push(format!("Message: {}", plan.message));
    if !plan.steps.is_empty() {
        lines.push(String::new());
        lines.push("📋 Recommended Steps:".to_string());
        for (i, step) in plan.steps.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, step.description));
            lines.push(format!("   Command: {}", step.command));
            lines.push(format!("   Priority: {}", step.priority.as_str()));
            lines.push(String::new());
        }
    }

    lines.push(String::new());
    lines.push("🎉 Analysis complete!".to_string());
    lines.push(format!("🔗 Build URL: {}", analysis.url().unwrap_or("N/A")));
    lines
}

pub async fn run_with_client(
    args: &AdaptArgs,
    config: &Config,
    client: &dyn GitHubApi,
) -> Result<()> {
    let repo = config.resolve_repo(&args.repo)?;
    let poll = completion_poll(&config.wait, None, None);

    let analysis = analyze_latest(client, &repo, &args.workflow, &args.branch, &poll).await;
    let plan = AdaptationPlan::derive(&analysis, &config.analysis);

    if args.json {
        let report = AdaptReport {
            analysis: &analysis,
            plan: &plan,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_text(&repo, args, &analysis, &plan).join("\n"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::builds::analysis::{PlanAction, StepAction};
    use crate::infra::github::mock::GitHubMockServer;
    use crate::shared::config::AnalysisConfig;
    use std::time::Duration;

    fn repo() -> RepoRef {
        RepoRef {
            owner: "acme".to_string(),
            name: "dashboard".to_string(),
        }
    }

    fn fast(timeout_ms: u64) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[tokio::test]
    async fn no_runs_yields_no_runs_status() {
        let mock = GitHubMockServer::start().await;
        mock.repo("acme", "dashboard")
            .runs()
            .workflow("ci.yml")
            .branch("main")
            .list()
            .await;

        let analysis = analyze_latest(&mock.client(), &repo(), "ci.yml", "main", &fast(100)).await;

        assert_eq!(analysis.analysis.status, AnalysisStatus::NoRuns);
        assert!(analysis.run.is_none());
    }

    #[tokio::test]
    async fn fetch_error_yields_error_status() {
        let mock = GitHubMockServer::start().await;
        mock.repo("acme", "dashboard")
            .runs()
            .workflow("ci.yml")
            .list_error(500)
            .await;

        let analysis = analyze_latest(&mock.client(), &repo(), "ci.yml", "main", &fast(100)).await;

        assert_eq!(analysis.analysis.status, AnalysisStatus::Error);
        assert!(analysis.analysis.message.contains("500"));
    }

    #[tokio::test]
    async fn failed_latest_run_produces_fix_plan() {
        let mock = GitHubMockServer::start().await;
        let ctx = mock.repo("acme", "dashboard");
        ctx.runs()
            .workflow("ci.yml")
            .branch("main")
            .run(20, "completed", Some("failure"))
            .run(19, "completed", Some("success"))
            .list()
            .await;
        ctx.run(20)
            .job("unit tests", "failure")
            .job("lint", "failure")
            .jobs()
            .await;

        let analysis = analyze_latest(&mock.client(), &repo(), "ci.yml", "main", &fast(100)).await;
        let plan = AdaptationPlan::derive(&analysis, &AnalysisConfig::default());

        assert_eq!(analysis.analysis.status, AnalysisStatus::Failure);
        assert_eq!(analysis.run.as_ref().map(|r| r.run_id), Some(20));
        assert_eq!(plan.action, PlanAction::Fix);
        let steps: Vec<_> = plan.steps.iter().map(|s| s.action).collect();
        assert_eq!(steps, vec![StepAction::FixTests, StepAction::FixLint]);
    }

    #[tokio::test]
    async fn active_run_is_waited_for() {
        let mock = GitHubMockServer::start().await;
        let ctx = mock.repo("acme", "dashboard");
        ctx.runs()
            .workflow("ci.yml")
            .branch("main")
            .run(30, "in_progress", None)
            .list()
            .await;
        ctx.run(30).status("in_progress").max_calls(1).get().await;
        ctx.run(30).status("completed").conclusion("success").get().await;

        let analysis = analyze_latest(&mock.client(), &repo(), "ci.yml", "main", &fast(5000)).await;

        assert_eq!(analysis.analysis.status, AnalysisStatus::Success);
        assert_eq!(
            mock.received("GET", "/repos/acme/dashboard/actions/runs/30").await,
            2
        );
    }

    #[tokio::test]
    async fn active_run_times_out() {
        let mock = GitHubMockServer::start().await;
        let ctx = mock.repo("acme", "dashboard");
        ctx.runs()
            .workflow("ci.yml")
            .branch("main")
            .run(31, "queued", None)
            .list()
            .await;
        ctx.run(31).status("queued").get().await;

        let analysis = analyze_latest(&mock.client(), &repo(), "ci.yml", "main", &fast(20)).await;
        let plan = AdaptationPlan::derive(&analysis, &AnalysisConfig::default());

        assert_eq!(analysis.analysis.status, AnalysisStatus::Timeout);
        assert_eq!(analysis.run.as_ref().map(|r| r.run_id), Some(31));
        assert_eq!(plan.action, PlanAction::Review);
    }

    #[test]
    fn text_report_lists_plan_steps() {
        let analysis = RunAnalysis::without_run(AnalysisStatus::NoRuns, "No workflow runs found");
        let plan = AdaptationPlan::derive(&analysis, &AnalysisConfig::default());
        let args = AdaptArgs {
            repo: "dashboard".to_string(),
            workflow: "ci.yml".to_string(),
            branch: "main".to_string(),
            json: false,
        };

        let lines = render_text(&repo(), &args, &analysis, &plan);

        assert!(lines.contains(&"Status: no_runs".to_string()));
        assert!(lines.contains(&"Action: review".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("🔗 Build URL: N/A"));
    }
}
