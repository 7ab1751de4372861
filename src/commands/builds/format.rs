//! Rendering of workflow run lists as table, summary or JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::infra::github::models::{Conclusion, RunStatus, WorkflowRun};
use crate::shared::table::render_table;
use crate::shared::time::{format_duration, format_local};

use super::error::Result;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Summary => "summary",
        }
    }
}

/// Status tallies over a run list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub total: usize,
    pub completed: usize,
    pub success: usize,
    pub failed: usize,
    pub in_progress: usize,
    pub queued: usize,
}

impl RunCounts {
    pub fn from_runs(runs: &[WorkflowRun]) -> Self {
        let status = |s: RunStatus| runs.iter().filter(|r| r.status == s).count();
        let conclusion = |c: Conclusion| runs.iter().filter(|r| r.conclusion == Some(c)).count();

        Self {
            total: runs.len(),
            completed: status(RunStatus::Completed),
            success: conclusion(Conclusion::Success),
            failed: conclusion(Conclusion::Failure),
            in_progress: status(RunStatus::InProgress),
            queued: status(RunStatus::Queued),
        }
    }

    /// Whether any count the watcher reports on differs from `other`.
    pub fn differs_from(&self, other: &Self) -> bool {
        self.failed != other.failed
            || self.success != other.success
            || self.in_progress != other.in_progress
            || self.queued != other.queued
    }

    pub fn overall(&self) -> OverallStatus {
        if self.failed > 0 {
            OverallStatus::Failed
        } else if self.in_progress > 0 {
            OverallStatus::InProgress
        } else if self.queued > 0 {
            OverallStatus::Queued
        } else if self.success > 0 {
            OverallStatus::Success
        } else {
            OverallStatus::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    Failed,
    InProgress,
    Queued,
    Success,
    Unknown,
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Failed => "FAILED",
            Self::InProgress => "IN PROGRESS",
            Self::Queued => "QUEUED",
            Self::Success => "SUCCESS",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Failed => "❌",
            Self::InProgress => "🔄",
            Self::Queued => "⏳",
            Self::Success => "✅",
            Self::Unknown => "❓",
        }
    }
}

fn no_runs(repo: &str) -> String {
    format!("No workflow runs found for {repo}")
}

pub fn format_table(runs: &[WorkflowRun], repo: &str) -> String {
    if runs.is_empty() {
        return no_runs(repo);
    }

    let headers = [
        "Run ID",
        "Workflow",
        "Branch",
        "Status",
        "Conclusion",
        "Created",
        "Duration",
    ];
    let rows: Vec<Vec<String>> = runs
        .iter()
        .map(|run| {
            vec![
                run.id.to_string(),
                run.display_name().to_string(),
                run.branch().to_string(),
                run.status.to_string(),
                run.conclusion_str().to_string(),
                format_local(run.created_at),
                run.duration_secs()
                    .map_or_else(|| "Running".to_string(), format_duration),
            ]
        })
        .collect();

    render_table(&headers, &rows)
}

pub fn format_summary(runs: &[WorkflowRun], repo: &str) -> String {
    if runs.is_empty() {
        return no_runs(repo);
    }

    let counts = RunCounts::from_runs(runs);
    let overall = counts.overall();
    [
        format!("📊 Build Status Summary for {repo}"),
        "=====================================".to_string(),
        format!("Total Runs: {}", counts.total),
        format!("├── Completed: {}", counts.completed),
        format!("│   ├── Success: {}", counts.success),
        format!("│   └── Failed: {}", counts.failed),
        format!("├── In Progress: {}", counts.in_progress),
        format!("└── Queued: {}", counts.queued),
        String::new(),
        format!("{} Overall Status: {}", overall.marker(), overall.label()),
    ]
    .join("\n")
}

/// One line per repository, as printed by the periodic watcher.
pub fn format_one_line(runs: &[WorkflowRun], repo: &str) -> String {
    if runs.is_empty() {
        return no_runs(repo);
    }

    let counts = RunCounts::from_runs(runs);
    let overall = counts.overall();
    format!(
        "{} {repo}: {} ({}✅ {}❌ {}🔄 {}⏳)",
        overall.marker(),
        overall.label(),
        counts.success,
        counts.failed,
        counts.in_progress,
        counts.queued
    )
}

/// Compact per-run listing used by the watcher's table format.
pub fn format_run_list(runs: &[WorkflowRun], repo: &str, now: DateTime<Utc>) -> String {
    let mut lines = vec![format!("📊 {repo} - {}", format_local(now))];
    for run in runs {
        let state = run
            .conclusion
            .map_or_else(|| run.status.as_str(), |c| c.as_str());
        let marker = match run.conclusion {
            Some(Conclusion::Success) => "✅",
            Some(Conclusion::Failure) => "❌",
            _ => "🔄",
        };
        lines.push(format!(
            "  {marker} {} ({}) - {state}",
            run.display_name(),
            run.branch()
        ));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct RunJson<'a> {
    id: u64,
    name: Option<&'a str>,
    status: RunStatus,
    conclusion: Option<Conclusion>,
    branch: Option<&'a str>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    duration: Option<i64>,
}

#[derive(Serialize)]
struct RunsJson<'a> {
    repository: &'a str,
    timestamp: String,
    total_runs: usize,
    runs: Vec<RunJson<'a>>,
}

pub fn format_json(runs: &[WorkflowRun], repo: &str, now: DateTime<Utc>) -> Result<String> {
    let document = RunsJson {
        repository: repo,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_runs: runs.len(),
        runs: runs
            .iter()
            .map(|run| RunJson {
                id: run.id,
                name: run.name.as_deref(),
                status: run.status,
                conclusion: run.conclusion,
                branch: run.head_branch.as_deref(),
                created_at: run.created_at,
                updated_at: run.updated_at,
                duration: run.duration_secs(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn render(format: OutputFormat, runs: &[WorkflowRun], repo: &str) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(runs, repo)),
        OutputFormat::Summary => Ok(format_summary(runs, repo)),
        OutputFormat::Json => format_json(runs, repo, Utc::now()),
    }
}
