//! Failure categorization and adaptation planning for workflow runs.
//!
//! Failed jobs are classified by case-insensitive substrings of their names.
//! A job named "build and test" lands in both the test and build categories.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infra::github::models::{Conclusion, Job, RunStatus, WorkflowRun};
use crate::shared::config::AnalysisConfig;
use crate::shared::time::elapsed_secs;

pub const GENERIC_RECOMMENDATION: &str = "Review build logs for specific failure details";
pub const MANUAL_LOGS_RECOMMENDATION: &str = "Check build logs manually for failure details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Test,
    Build,
    Lint,
    Deploy,
}

impl FailureCategory {
    /// Precedence order for recommendations.
    pub const ALL: [Self; 4] = [Self::Test, Self::Build, Self::Lint, Self::Deploy];

    fn keyword(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Build => "build",
            Self::Lint => "lint",
            Self::Deploy => "deploy",
        }
    }

    pub fn matches(&self, job_name: &str) -> bool {
        job_name.to_lowercase().contains(self.keyword())
    }

    /// Every category whose keyword appears in `job_name`.
    pub fn for_job(job_name: &str) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|c| c.matches(job_name))
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Test => "Test failures",
            Self::Build => "Build failures",
            Self::Lint => "Linting failures",
            Self::Deploy => "Deployment failures",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Test => "Review and fix failing tests",
            Self::Build => "Check dependencies and build configuration",
            Self::Lint => "Fix code style issues",
            Self::Deploy => "Check deployment configuration and credentials",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Test => "Test failures detected - review test code and fix failing tests",
            Self::Build => "Build failures detected - check dependencies and build configuration",
            Self::Lint => "Linting failures detected - fix code style issues",
            Self::Deploy => {
                "Deployment failures detected - check deployment configuration and credentials"
            }
        }
    }

    /// Local command that reproduces the failure. Deployments have none.
    pub fn command<'a>(&self, commands: &'a AnalysisConfig) -> Option<&'a str> {
        match self {
            Self::Test => Some(&commands.test_command),
            Self::Build => Some(&commands.build_command),
            Self::Lint => Some(&commands.lint_command),
            Self::Deploy => None,
        }
    }
}

/// First category (in precedence order) matched by any failed job name.
pub fn recommend<'a>(failed_job_names: impl IntoIterator<Item = &'a str> + Clone) -> &'static str {
    FailureCategory::ALL
        .into_iter()
        .find(|category| failed_job_names.clone().into_iter().any(|n| category.matches(n)))
        .map_or(GENERIC_RECOMMENDATION, |c| c.recommendation())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Success,
    Failure,
    Cancelled,
    Unknown,
    Timeout,
    NoRuns,
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
            Self::Timeout => "timeout",
            Self::NoRuns => "no_runs",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub duration_secs: Option<i64>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        let duration_secs = match (job.started_at, job.completed_at) {
            (Some(start), Some(end)) => Some(elapsed_secs(start, end)),
            _ => None,
        };
        Self {
            name: job.name.clone(),
            status: job.status,
            conclusion: job.conclusion,
            duration_secs,
        }
    }
}

impl JobSummary {
    pub fn is_failed(&self) -> bool {
        self.conclusion == Some(Conclusion::Failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisOutcome {
    pub status: AnalysisStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<JobSummary>,
}

impl AnalysisOutcome {
    pub fn new(status: AnalysisStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            recommendation: None,
            jobs: Vec::new(),
        }
    }

    fn recommending(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Metadata of the run an analysis is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunDetails {
    pub run_id: u64,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub workflow: Option<String>,
    pub branch: Option<String>,
    pub commit: String,
    pub actor: Option<String>,
}

impl From<&WorkflowRun> for RunDetails {
    fn from(run: &WorkflowRun) -> Self {
        Self {
            run_id: run.id,
            status: run.status,
            conclusion: run.conclusion,
            url: run.html_url.clone(),
            created_at: run.created_at,
            updated_at: run.updated_at,
            duration_secs: elapsed_secs(run.created_at, run.updated_at),
            workflow: run.name.clone(),
            branch: run.head_branch.clone(),
            commit: run.head_sha.clone(),
            actor: run.actor.as_ref().map(|a| a.login.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunDetails>,
    pub analysis: AnalysisOutcome,
}

impl RunAnalysis {
    /// Analysis that never reached a concrete run.
    pub fn without_run(status: AnalysisStatus, message: impl Into<String>) -> Self {
        Self {
            run: None,
            analysis: AnalysisOutcome::new(status, message),
        }
    }

    /// Classify a completed run. `jobs` is only consulted for failures; `None`
    /// means the job listing could not be fetched.
    pub fn of_completed(run: &WorkflowRun, jobs: Option<&[Job]>) -> Self {
        let analysis = match run.conclusion {
            Some(Conclusion::Success) => {
                AnalysisOutcome::new(AnalysisStatus::Success, "Build completed successfully")
                    .recommending("No action needed")
            }
            Some(Conclusion::Failure) => {
                let outcome = AnalysisOutcome::new(AnalysisStatus::Failure, "Build failed");
                match jobs {
                    Some(jobs) => {
                        let jobs: Vec<JobSummary> = jobs.iter().map(JobSummary::from).collect();
                        let recommendation = recommend(
                            jobs.iter().filter(|j| j.is_failed()).map(|j| j.name.as_str()),
                        );
                        AnalysisOutcome { jobs, ..outcome }.recommending(recommendation)
                    }
                    None => outcome.recommending(MANUAL_LOGS_RECOMMENDATION),
                }
            }
            Some(Conclusion::Cancelled) => {
                AnalysisOutcome::new(AnalysisStatus::Cancelled, "Build was cancelled")
                    .recommending("Build was manually cancelled")
            }
            other => AnalysisOutcome::new(
                AnalysisStatus::Unknown,
                format!(
                    "Unknown conclusion: {}",
                    other.map_or("none", |c| c.as_str())
                ),
            )
            .recommending("Check build status manually"),
        };

        Self {
            run: Some(RunDetails::from(run)),
            analysis,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.url.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    None,
    Fix,
    Review,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fix => "fix",
            Self::Review => "review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    FixTests,
    FixBuild,
    FixLint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdaptationStep {
    pub action: StepAction,
    pub description: String,
    pub command: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdaptationPlan {
    pub action: PlanAction,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<AdaptationStep>,
}

impl AdaptationPlan {
    pub fn derive(analysis: &RunAnalysis, commands: &AnalysisConfig) -> Self {
        match analysis.analysis.status {
            AnalysisStatus::Success => Self {
                action: PlanAction::None,
                message: "Build successful".to_string(),
                priority: None,
                steps: Vec::new(),
            },
            AnalysisStatus::Failure => Self {
                action: PlanAction::Fix,
                message: analysis
                    .analysis
                    .recommendation
                    .clone()
                    .unwrap_or_else(|| GENERIC_RECOMMENDATION.to_string()),
                priority: Some(Priority::High),
                steps: fix_steps(&analysis.analysis.jobs, commands),
            },
            _ => Self {
                action: PlanAction::Review,
                message: "Manual review required".to_string(),
                priority: None,
                steps: Vec::new(),
            },
        }
    }
}

fn fix_steps(jobs: &[JobSummary], commands: &AnalysisConfig) -> Vec<AdaptationStep> {
    let mut steps = Vec::new();
    for job in jobs.iter().filter(|j| j.is_failed()) {
        for category in FailureCategory::for_job(&job.name) {
            let (action, verb, priority) = match category {
                FailureCategory::Test => (StepAction::FixTests, "Fix failing tests", Priority::High),
                FailureCategory::Build => (StepAction::FixBuild, "Fix build issues", Priority::High),
                FailureCategory::Lint => {
                    (StepAction::FixLint, "Fix linting issues", Priority::Medium)
                }
                FailureCategory::Deploy => continue,
            };
            let Some(command) = category.command(commands) else {
                continue;
            };
            steps.push(AdaptationStep {
                action,
                description: format!("{verb} in {}", job.name),
                command: command.to_string(),
                priority,
            });
        }
    }
    steps
}
