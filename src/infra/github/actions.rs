//! GitHub Actions operations.

use reqwest::Method;
use serde_json::json;

use super::client::{GitHubClient, encode_segment};
use super::error::{Result, is_not_found};
use super::models::{Jobs, WorkflowRun, WorkflowRuns, Workflows};

/// Filters for listing workflow runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Workflow file name or numeric ID.
    pub workflow: Option<String>,
    pub branch: Option<String>,
    pub per_page: u32,
}

/// Largest page size the runs endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

impl RunFilter {
    /// `per_page` is clamped to `1..=MAX_PER_PAGE`.
    pub fn new(per_page: u32) -> Self {
        Self {
            workflow: None,
            branch: None,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    fn without_workflow(&self) -> Self {
        Self {
            workflow: None,
            ..self.clone()
        }
    }
}

/// Trait for GitHub Actions operations.
#[async_trait::async_trait]
pub trait ActionsClient: Send + Sync {
    /// List runs newest first. With a workflow set, only that workflow's runs.
    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        filter: &RunFilter,
    ) -> Result<WorkflowRuns>;

    async fn get_workflow_run(&self, owner: &str, repo: &str, run_id: u64)
    -> Result<WorkflowRun>;

    async fn list_run_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Jobs>;

    async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Workflows>;

    /// `POST .../workflows/{workflow}/dispatches`. GitHub answers 204 with no
    /// run ID, so callers have to find the run themselves.
    async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow: &str,
        git_ref: &str,
        inputs: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()>;
}

#[async_trait::async_trait]
impl ActionsClient for GitHubClient {
    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        filter: &RunFilter,
    ) -> Result<WorkflowRuns> {
        let base = format!(
            "/repos/{}/{}/actions",
            encode_segment(owner),
            encode_segment(repo)
        );
        let path = match &filter.workflow {
            Some(workflow) => format!("{base}/workflows/{}/runs", encode_segment(workflow)),
            None => format!("{base}/runs"),
        };

        let mut query = vec![("per_page", filter.per_page.to_string())];
        if let Some(branch) = &filter.branch {
            query.push(("branch", branch.clone()));
        }

        self.get(&path, &query).await
    }

    async fn get_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<WorkflowRun> {
        let path = format!(
            "/repos/{}/{}/actions/runs/{run_id}",
            encode_segment(owner),
            encode_segment(repo)
        );
        self.get(&path, &[]).await
    }

    async fn list_run_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Jobs> {
        let path = format!(
            "/repos/{}/{}/actions/runs/{run_id}/jobs",
            encode_segment(owner),
            encode_segment(repo)
        );
        self.get(&path, &[("per_page", "100".to_string())]).await
    }

    async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Workflows> {
        let path = format!(
            "/repos/{}/{}/actions/workflows",
            encode_segment(owner),
            encode_segment(repo)
        );
        self.get(&path, &[("per_page", "100".to_string())]).await
    }

    async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow: &str,
        git_ref: &str,
        inputs: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/actions/workflows/{}/dispatches",
            encode_segment(owner),
            encode_segment(repo),
            encode_segment(workflow)
        );
        self.send(
            Method::POST,
            &path,
            &json!({ "ref": git_ref, "inputs": inputs }),
        )
        .await
    }
}

/// List runs, retrying across all workflows when the named one is missing.
pub async fn list_runs_with_fallback<C: ActionsClient + ?Sized>(
    client: &C,
    owner: &str,
    repo: &str,
    filter: &RunFilter,
) -> Result<WorkflowRuns> {
    match client.list_workflow_runs(owner, repo, filter).await {
        Err(e) if is_not_found(&e) && filter.workflow.is_some() => {
            let workflow = filter.workflow.as_deref().unwrap_or_default();
            println!("⚠️  Workflow '{workflow}' not found, checking all workflows...");
            tracing::warn!(owner, repo, workflow, "workflow not found, listing all runs");
            client
                .list_workflow_runs(owner, repo, &filter.without_workflow())
                .await
        }
        other => other,
    }
}
