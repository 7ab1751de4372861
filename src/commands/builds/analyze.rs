//! Detailed report for a single workflow run.

use clap::Args;

use crate::infra::github::GitHubApi;
use crate::infra::github::models::{Conclusion, Job, WorkflowRun};
use crate::shared::config::{AnalysisConfig, Config, RepoRef};
use crate::shared::time::elapsed_secs;

use super::analysis::FailureCategory;
use super::error::Result;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    /// Repository alias, name, or owner/repo
    pub repo: String,

    /// Workflow run ID
    pub run_id: u64,
}

fn underline(title: &str) -> [String; 2] {
    [title.to_string(), "=".repeat(title.chars().count())]
}

fn run_details(run: &WorkflowRun) -> Vec<String> {
    vec![
        "📋 Run Details:".to_string(),
        format!("  ID: {}", run.id),
        format!("  Status: {}", run.status),
        format!(
            "  Conclusion: {}",
            run.conclusion.map_or("pending", |c| c.as_str())
        ),
        format!("  Workflow: {}", run.display_name()),
        format!("  Branch: {}", run.branch()),
        format!("  Commit: {}", run.short_sha()),
        format!(
            "  Actor: {}",
            run.actor.as_ref().map_or("unknown", |a| a.login.as_str())
        ),
        format!("  Created: {}", run.created_at.to_rfc3339()),
        format!("  Updated: {}", run.updated_at.to_rfc3339()),
        format!(
            "  Duration: {}s",
            elapsed_secs(run.created_at, run.updated_at)
        ),
        format!("  URL: {}", run.html_url),
    ]
}

fn job_marker(job: &Job) -> &'static str {
    match job.conclusion {
        Some(Conclusion::Success) => "✅",
        Some(Conclusion::Failure) => "❌",
        _ => "⏳",
    }
}

fn job_details(jobs: &[Job]) -> Vec<String> {
    let mut lines = vec![String::new()];
    lines.extend(underline("📋 Job Details:"));
    for (i, job) in jobs.iter().enumerate() {
        let duration = match (job.started_at, job.completed_at) {
            (Some(start), Some(end)) => format!("{}s", elapsed_secs(start, end)),
            _ => "N/A".to_string(),
        };
        lines.push(format!("{}. {} {}", i + 1, job_marker(job), job.name));
        lines.push(format!(
            "   Status: {} ({})",
            job.status,
            job.conclusion.map_or("pending", |c| c.as_str())
        ));
        lines.push(format!("   Duration: {duration}"));
        lines.push(format!(
            "   Started: {}",
            job.started_at.map_or_else(|| "N/A".to_string(), |t| t.to_rfc3339())
        ));
        lines.push(format!(
            "   Completed: {}",
            job.completed_at.map_or_else(|| "N/A".to_string(), |t| t.to_rfc3339())
        ));
        lines.push(String::new());
    }
    lines
}

fn recommended_actions(category: FailureCategory, commands: &AnalysisConfig) -> Vec<String> {
    match category {
        FailureCategory::Test => vec![
            "🔧 Fix failing tests".to_string(),
            "   - Review test output in build logs".to_string(),
            "   - Update test code to match current implementation".to_string(),
            format!("   - Run tests locally: {}", commands.test_command),
        ],
        FailureCategory::Build => vec![
            "🔧 Fix build issues".to_string(),
            "   - Check project dependencies".to_string(),
            "   - Verify build configuration".to_string(),
            format!("   - Run build locally: {}", commands.build_command),
        ],
        FailureCategory::Lint => vec![
            "🔧 Fix linting issues".to_string(),
            format!(
                "   - Fix code style issues automatically: {}",
                commands.lint_command
            ),
        ],
        FailureCategory::Deploy => vec![
            "🔧 Fix deployment".to_string(),
            "   - Check deployment configuration and credentials".to_string(),
        ],
    }
}

/// Per-job categorization, grouped actions and next steps for failed jobs.
pub(crate) fn failure_report(
    run: &WorkflowRun,
    jobs: &[Job],
    commands: &AnalysisConfig,
) -> Vec<String> {
    let failed: Vec<&Job> = jobs.iter().filter(|j| j.is_failed()).collect();
    if failed.is_empty() {
        return vec![
            "⚠️  No failed jobs found, but build marked as failed".to_string(),
            format!("   Check the build logs manually: {}", run.html_url),
        ];
    }

    let mut lines = underline("🔍 Failure Analysis:").to_vec();
    for job in &failed {
        let categories = FailureCategory::for_job(&job.name);
        if categories.is_empty() {
            lines.push(format!("❓ Unclassified failure in: {}", job.name));
            lines.push("   Action: Review the job logs manually".to_string());
        }
        for category in categories {
            lines.push(format!("❌ {} in: {}", category.label(), job.name));
            lines.push(format!("   Action: {}", category.action()));
            if let Some(command) = category.command(commands) {
                lines.push(format!("   Command: {command}"));
            }
        }
    }

    lines.push(String::new());
    lines.extend(underline("🔄 Recommended Actions:"));
    let matched = FailureCategory::ALL
        .into_iter()
        .filter(|c| failed.iter().any(|j| c.matches(&j.name)));
    for (i, category) in matched.enumerate() {
        let mut action = recommended_actions(category, commands);
        action[0] = format!("{}. {}", i + 1, action[0]);
        lines.extend(action);
    }

    lines.push(String::new());
    lines.extend(underline("📋 Next Steps:"));
    lines.push(format!("1. Check the build logs at: {}", run.html_url));
    lines.push("2. Fix the issues identified above".to_string());
    lines.push("3. Test locally before pushing changes".to_string());
    lines.push("4. Push fixes and trigger a new build".to_string());
    lines
}

/// Build the full report for a run. Only fetching the run itself can fail.
pub(crate) async fn analyze_run(
    client: &dyn GitHubApi,
    repo: &RepoRef,
    run_id: u64,
    commands: &AnalysisConfig,
) -> Result<Vec<String>> {
    let run = client
        .get_workflow_run(&repo.owner, &repo.name, run_id)
        .await?;
    let mut lines = run_details(&run);

    if !run.status.is_completed() {
        lines.push("⏳ Build is still in progress".to_string());
        lines.push(format!("📋 Status: {}", run.status));
        lines.push(format!("📋 Check progress at: {}", run.html_url));
        return Ok(lines);
    }

    lines.push(String::new());
    lines.extend(underline("📊 Analysis Results:"));
    match run.conclusion {
        Some(Conclusion::Success) => {
            lines.push("✅ Build successful!".to_string());
            lines.push("📋 Recommendation: No action needed".to_string());
        }
        Some(Conclusion::Failure) => {
            lines.push("❌ Build failed, analyzing job details...".to_string());
            match client.list_run_jobs(&repo.owner, &repo.name, run_id).await {
                Ok(jobs) => {
                    lines.extend(job_details(&jobs.jobs));
                    lines.extend(failure_report(&run, &jobs.jobs, commands));
                }
                Err(e) => {
                    tracing::warn!(%repo, run_id, error = %e, "could not list jobs");
                    lines.push(format!("⚠️  Could not get job details: {e}"));
                    lines.push(format!("   Check build logs manually: {}", run.html_url));
                }
            }
        }
        Some(Conclusion::Cancelled) => {
            lines.push("⚠️  Build was cancelled".to_string());
            lines.push(
                "📋 Recommendation: Build was manually cancelled, no action needed".to_string(),
            );
        }
        other => {
            lines.push(format!(
                "❓ Unknown conclusion: {}",
                other.map_or("none", |c| c.as_str())
            ));
            lines.push("📋 Recommendation: Check build logs manually".to_string());
        }
    }
    Ok(lines)
}

pub async fn run_with_client(
    args: &AnalyzeArgs,
    config: &Config,
    client: &dyn GitHubApi,
) -> Result<()> {
    let repo = config.resolve_repo(&args.repo)?;

    println!("🚀 Analyzing workflow run for {repo}");
    println!("📋 Run ID: {}", args.run_id);
    println!("=====================================");

    let lines = analyze_run(client, &repo, args.run_id, &config.analysis).await?;
    println!("{}", lines.join("\n"));
    println!("\n🎉 Analysis complete!");
    Ok(())
}
