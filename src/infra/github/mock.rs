//! wiremock-based GitHub mock server for testing.
//!
//! Provides `GitHubMockServer` for HTTP-level mocking of GitHub API calls.
//!
//! # Usage
//!
//! ```ignore
//! let mock = GitHubMockServer::start().await;
//! let ctx = mock.repo("owner", "repo");
//!
//! // Repository
//! ctx.repo_info().private(true).get().await;
//! ctx.repo_info().get_not_found().await;
//!
//! // Actions
//! ctx.runs().workflow("ci.yml").branch("main").run(1, "completed", Some("success")).list().await;
//! ctx.run(1).status("in_progress").max_calls(2).get().await;
//! ctx.run(1).job("unit tests", "failure").jobs().await;
//!
//! // Organization (server-level, not repo-scoped)
//! mock.org("acme").teams(&["core-developers"]).await;
//! mock.current_user("testuser").await;
//! ```

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::client::GitHubClient;

const CREATED_AT: &str = "2024-01-01T00:00:00Z";
const UPDATED_AT: &str = "2024-01-01T00:02:05Z";

fn mock_user(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "type": "User",
        "name": "Test User",
        "email": null,
        "html_url": format!("https://github.com/{login}")
    })
}

fn mock_repository(
    owner: &str,
    repo: &str,
    is_private: bool,
    description: &str,
    default_branch: &str,
) -> serde_json::Value {
    json!({
        "id": 1,
        "name": repo,
        "full_name": format!("{owner}/{repo}"),
        "private": is_private,
        "owner": mock_user(owner),
        "html_url": format!("https://github.com/{owner}/{repo}"),
        "description": description,
        "default_branch": default_branch,
        "topics": ["bitcoin"]
    })
}

fn mock_run(owner: &str, repo: &str, spec: &RunSpec) -> serde_json::Value {
    json!({
        "id": spec.id,
        "name": spec.name,
        "head_branch": spec.branch,
        "head_sha": "0123456789abcdef0123456789abcdef01234567",
        "status": spec.status,
        "conclusion": spec.conclusion,
        "event": "push",
        "workflow_id": 1,
        "html_url": format!("https://github.com/{owner}/{repo}/actions/runs/{}", spec.id),
        "created_at": spec.created_at,
        "updated_at": spec.updated_at,
        "actor": mock_user("testuser")
    })
}

fn mock_team(slug: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "name": slug,
        "slug": slug,
        "description": format!("{slug} team"),
        "privacy": "closed"
    })
}

fn mock_project(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "body": format!("{name} board"),
        "state": "open"
    })
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest"
    }))
}

/// Mount `mock`, limited to `max_calls` matches when set.
async fn mount_limited(
    mock: wiremock::MockBuilder,
    response: ResponseTemplate,
    max_calls: Option<u64>,
    server: &MockServer,
) {
    let mock = mock.respond_with(response);
    match max_calls {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// wiremock-based GitHub mock server for testing.
///
/// This provides HTTP-level mocking for GitHub API endpoints, allowing tests
/// to verify actual HTTP requests rather than mocking at the trait level.
pub struct GitHubMockServer {
    server: MockServer,
}

impl GitHubMockServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get an authenticated GitHubClient configured to use this mock server.
    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_base_url(&self.server.uri(), "test-token").unwrap()
    }

    /// Get a GitHubClient without a token.
    pub fn anonymous_client(&self) -> GitHubClient {
        GitHubClient::anonymous(&self.server.uri()).unwrap()
    }

    /// Create a repository context for building mocks.
    pub fn repo<'a>(&'a self, owner: &'a str, repo: &'a str) -> MockRepoContext<'a> {
        MockRepoContext {
            server: &self.server,
            owner,
            repo,
        }
    }

    /// Create an organization context for building mocks.
    pub fn org<'a>(&'a self, login: &'a str) -> MockOrgContext<'a> {
        MockOrgContext {
            server: &self.server,
            login,
        }
    }

    /// Mock GET /user for current user.
    pub async fn current_user(&self, login: &str) {
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_user(login)))
            .mount(&self.server)
            .await;
    }

    /// Mock GET /rate_limit.
    pub async fn rate_limit(&self, limit: u64, remaining: u64) {
        let core = json!({
            "limit": limit,
            "remaining": remaining,
            "reset": 1_704_067_200,
            "used": limit - remaining
        });
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {"core": core},
                "rate": core
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of received requests matching `method` and `path`.
    pub async fn received(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }
}

// ============ Builder Pattern API ============

/// Repository context for building mocks.
pub struct MockRepoContext<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> MockRepoContext<'a> {
    fn base(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.repo)
    }

    /// Create a repository info mock builder.
    pub fn repo_info(&self) -> MockRepoInfoBuilder<'a> {
        MockRepoInfoBuilder {
            server: self.server,
            owner: self.owner,
            repo: self.repo,
            is_private: false,
            description: "Test repository",
            default_branch: "main",
        }
    }

    /// Create a workflow run list mock builder.
    pub fn runs(&self) -> MockRunsBuilder<'a> {
        MockRunsBuilder {
            server: self.server,
            owner: self.owner,
            repo: self.repo,
            workflow: None,
            branch: None,
            runs: Vec::new(),
            max_calls: None,
        }
    }

    /// Create a single workflow run mock builder.
    pub fn run(&self, id: u64) -> MockRunBuilder<'a> {
        MockRunBuilder {
            server: self.server,
            owner: self.owner,
            repo: self.repo,
            spec: RunSpec::new(id, "completed", Some("success")),
            jobs: Vec::new(),
            max_calls: None,
        }
    }

    /// Mock GET /repos/{owner}/{repo}/actions/workflows.
    pub async fn workflows(&self, workflows: &[(&str, &str)]) {
        let items: Vec<_> = workflows
            .iter()
            .enumerate()
            .map(|(i, (name, file))| {
                json!({"id": i + 1, "name": name, "path": file, "state": "active"})
            })
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("{}/actions/workflows", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": items.len(),
                "workflows": items
            })))
            .mount(self.server)
            .await;
    }

    /// Mock POST .../actions/workflows/{workflow}/dispatches expecting `body`.
    pub async fn dispatch(&self, workflow: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!(
                "{}/actions/workflows/{workflow}/dispatches",
                self.base()
            )))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(204))
            .mount(self.server)
            .await;
    }

    /// Mock PUT /repos/{owner}/{repo}/topics expecting `body`.
    pub async fn topics(&self, body: serde_json::Value) {
        let names = body.get("names").cloned().unwrap_or_default();
        Mock::given(method("PUT"))
            .and(path(format!("{}/topics", self.base())))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"names": names})))
            .mount(self.server)
            .await;
    }

    /// Mock PUT .../branches/{branch}/protection. `branch` is matched as sent
    /// on the wire (percent-encoded).
    pub async fn branch_protection(&self, branch: &str) {
        Mock::given(method("PUT"))
            .and(path(format!("{}/branches/{branch}/protection", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": format!("https://api.github.com{}/branches/{branch}/protection", self.base())
            })))
            .mount(self.server)
            .await;
    }

    /// Mock any PUT .../branches/{branch}/protection failing with `status`.
    pub async fn branch_protection_error(&self, branch: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("{}/branches/{branch}/protection", self.base())))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "Upgrade to GitHub Pro"})),
            )
            .mount(self.server)
            .await;
    }
}

/// Builder for mocking repository info endpoints.
pub struct MockRepoInfoBuilder<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
    is_private: bool,
    description: &'a str,
    default_branch: &'a str,
}

impl<'a> MockRepoInfoBuilder<'a> {
    /// Set whether the repository is private.
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    /// Set the default branch.
    pub fn default_branch(mut self, branch: &'a str) -> Self {
        self.default_branch = branch;
        self
    }

    fn body(&self) -> serde_json::Value {
        mock_repository(
            self.owner,
            self.repo,
            self.is_private,
            self.description,
            self.default_branch,
        )
    }

    /// Mount mock for GET /repos/{owner}/{repo}.
    pub async fn get(self) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/{}", self.owner, self.repo)))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.body()))
            .mount(self.server)
            .await;
    }

    /// Mount mock for GET /repos/{owner}/{repo} returning 404.
    pub async fn get_not_found(self) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/{}", self.owner, self.repo)))
            .respond_with(not_found())
            .mount(self.server)
            .await;
    }

    /// Mount mock for PATCH /repos/{owner}/{repo} expecting `body`.
    pub async fn update(self, body: serde_json::Value) {
        Mock::given(method("PATCH"))
            .and(path(format!("/repos/{}/{}", self.owner, self.repo)))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.body()))
            .mount(self.server)
            .await;
    }

    /// Mount mock for any PATCH /repos/{owner}/{repo}.
    pub async fn update_any(self) {
        Mock::given(method("PATCH"))
            .and(path(format!("/repos/{}/{}", self.owner, self.repo)))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.body()))
            .mount(self.server)
            .await;
    }
}

/// Workflow run fixture.
#[derive(Clone)]
pub struct RunSpec {
    pub id: u64,
    pub name: String,
    pub branch: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RunSpec {
    pub fn new(id: u64, status: &str, conclusion: Option<&str>) -> Self {
        Self {
            id,
            name: "CI".to_string(),
            branch: "main".to_string(),
            status: status.to_string(),
            conclusion: conclusion.map(str::to_string),
            created_at: CREATED_AT.to_string(),
            updated_at: UPDATED_AT.to_string(),
        }
    }
}

/// Builder for mocking workflow run listings.
pub struct MockRunsBuilder<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
    workflow: Option<&'a str>,
    branch: Option<&'a str>,
    runs: Vec<RunSpec>,
    max_calls: Option<u64>,
}

impl<'a> MockRunsBuilder<'a> {
    /// Match `/actions/workflows/{workflow}/runs` instead of `/actions/runs`.
    pub fn workflow(mut self, workflow: &'a str) -> Self {
        self.workflow = Some(workflow);
        self
    }

    /// Require the `branch` query parameter.
    pub fn branch(mut self, branch: &'a str) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn run(mut self, id: u64, status: &str, conclusion: Option<&str>) -> Self {
        let mut spec = RunSpec::new(id, status, conclusion);
        if let Some(branch) = self.branch {
            spec.branch = branch.to_string();
        }
        self.runs.push(spec);
        self
    }

    pub fn run_spec(mut self, spec: RunSpec) -> Self {
        self.runs.push(spec);
        self
    }

    /// Stop matching after `n` requests.
    pub fn max_calls(mut self, n: u64) -> Self {
        self.max_calls = Some(n);
        self
    }

    fn request(&self) -> wiremock::MockBuilder {
        let base = format!("/repos/{}/{}/actions", self.owner, self.repo);
        let endpoint = match self.workflow {
            Some(workflow) => format!("{base}/workflows/{workflow}/runs"),
            None => format!("{base}/runs"),
        };
        let mock = Mock::given(method("GET")).and(path(endpoint));
        match self.branch {
            Some(branch) => mock.and(query_param("branch", branch)),
            None => mock,
        }
    }

    /// Mount the run list.
    pub async fn list(self) {
        let runs: Vec<_> = self
            .runs
            .iter()
            .map(|spec| mock_run(self.owner, self.repo, spec))
            .collect();
        let response = ResponseTemplate::new(200).set_body_json(json!({
            "total_count": runs.len(),
            "workflow_runs": runs
        }));
        mount_limited(self.request(), response, self.max_calls, self.server).await;
    }

    /// Mount a 404 for the listing.
    pub async fn list_not_found(self) {
        mount_limited(self.request(), not_found(), self.max_calls, self.server).await;
    }

    /// Mount an error status for the listing.
    pub async fn list_error(self, status: u16) {
        let response =
            ResponseTemplate::new(status).set_body_json(json!({"message": "Server Error"}));
        mount_limited(self.request(), response, self.max_calls, self.server).await;
    }
}

/// Builder for mocking a single workflow run and its jobs.
pub struct MockRunBuilder<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
    spec: RunSpec,
    jobs: Vec<(String, Option<String>)>,
    max_calls: Option<u64>,
}

impl<'a> MockRunBuilder<'a> {
    pub fn status(mut self, status: &str) -> Self {
        self.spec.status = status.to_string();
        if status != "completed" {
            self.spec.conclusion = None;
        }
        self
    }

    pub fn conclusion(mut self, conclusion: &str) -> Self {
        self.spec.conclusion = Some(conclusion.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.spec.name = name.to_string();
        self
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.spec.branch = branch.to_string();
        self
    }

    /// Add a job with the given conclusion ("" for a running job).
    pub fn job(mut self, name: &str, conclusion: &str) -> Self {
        let conclusion = (!conclusion.is_empty()).then(|| conclusion.to_string());
        self.jobs.push((name.to_string(), conclusion));
        self
    }

    /// Stop matching after `n` requests.
    pub fn max_calls(mut self, n: u64) -> Self {
        self.max_calls = Some(n);
        self
    }

    fn run_path(&self) -> String {
        format!(
            "/repos/{}/{}/actions/runs/{}",
            self.owner, self.repo, self.spec.id
        )
    }

    /// Mount mock for GET .../actions/runs/{id}.
    pub async fn get(self) {
        let response = ResponseTemplate::new(200)
            .set_body_json(mock_run(self.owner, self.repo, &self.spec));
        let mock = Mock::given(method("GET")).and(path(self.run_path()));
        mount_limited(mock, response, self.max_calls, self.server).await;
    }

    /// Mount a 404 for GET .../actions/runs/{id}.
    pub async fn get_not_found(self) {
        let mock = Mock::given(method("GET")).and(path(self.run_path()));
        mount_limited(mock, not_found(), self.max_calls, self.server).await;
    }

    /// Mount mock for GET .../actions/runs/{id}/jobs.
    pub async fn jobs(self) {
        let jobs: Vec<_> = self
            .jobs
            .iter()
            .enumerate()
            .map(|(i, (name, conclusion))| {
                let status = if conclusion.is_some() {
                    "completed"
                } else {
                    "in_progress"
                };
                json!({
                    "id": i + 1,
                    "name": name,
                    "status": status,
                    "conclusion": conclusion,
                    "started_at": CREATED_AT,
                    "completed_at": conclusion.as_ref().map(|_| UPDATED_AT),
                    "html_url": format!("https://github.com/{}/{}/actions/runs/{}/job/{}", self.owner, self.repo, self.spec.id, i + 1)
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("{}/jobs", self.run_path())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": jobs.len(),
                "jobs": jobs
            })))
            .mount(self.server)
            .await;
    }

    /// Mount an error for GET .../actions/runs/{id}/jobs.
    pub async fn jobs_error(self, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("{}/jobs", self.run_path())))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "Server Error"})),
            )
            .mount(self.server)
            .await;
    }
}

/// Organization context for building mocks.
pub struct MockOrgContext<'a> {
    server: &'a MockServer,
    login: &'a str,
}

impl<'a> MockOrgContext<'a> {
    fn base(&self) -> String {
        format!("/orgs/{}", self.login)
    }

    pub fn info(&self) -> MockOrgInfoBuilder<'a> {
        MockOrgInfoBuilder {
            server: self.server,
            login: self.login,
            plan: None,
            description: None,
        }
    }

    /// Mock GET /orgs/{org}/teams.
    pub async fn teams(&self, slugs: &[&str]) {
        let teams: Vec<_> = slugs.iter().map(|s| mock_team(s)).collect();
        Mock::given(method("GET"))
            .and(path(format!("{}/teams", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(teams))
            .mount(self.server)
            .await;
    }

    /// Mock POST /orgs/{org}/teams, echoing the requested name as the slug.
    pub async fn create_team(&self) {
        Mock::given(method("POST"))
            .and(path(format!("{}/teams", self.base())))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = req.body_json().unwrap_or_default();
                let name = body["name"].as_str().unwrap_or("team");
                ResponseTemplate::new(201).set_body_json(mock_team(name))
            })
            .mount(self.server)
            .await;
    }

    /// Mock POST /orgs/{org}/teams answering with a fixed `slug`.
    pub async fn create_team_with_slug(&self, slug: &str) {
        Mock::given(method("POST"))
            .and(path(format!("{}/teams", self.base())))
            .respond_with(ResponseTemplate::new(201).set_body_json(mock_team(slug)))
            .mount(self.server)
            .await;
    }

    /// Mock PATCH /orgs/{org}/teams/{slug}.
    pub async fn update_team(&self, slug: &str) {
        Mock::given(method("PATCH"))
            .and(path(format!("{}/teams/{slug}", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_team(slug)))
            .mount(self.server)
            .await;
    }

    /// Mock PUT /orgs/{org}/teams/{slug}/repos/{org}/{repo} expecting `permission`.
    pub async fn grant_team_repo(&self, slug: &str, repo: &str, permission: &str) {
        Mock::given(method("PUT"))
            .and(path(format!(
                "{}/teams/{slug}/repos/{}/{repo}",
                self.base(),
                self.login
            )))
            .and(body_json(json!({"permission": permission})))
            .respond_with(ResponseTemplate::new(204))
            .mount(self.server)
            .await;
    }

    /// Mock GET /orgs/{org}/repos.
    pub async fn repos(&self, names: &[&str]) {
        let repos: Vec<_> = names
            .iter()
            .map(|name| mock_repository(self.login, name, false, "Test repository", "main"))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("{}/repos", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(repos))
            .mount(self.server)
            .await;
    }

    /// Mock GET /orgs/{org}/projects.
    pub async fn projects(&self, names: &[&str]) {
        let projects: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| mock_project(i as u64 + 1, name))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("{}/projects", self.base())))
            .respond_with(ResponseTemplate::new(200).set_body_json(projects))
            .mount(self.server)
            .await;
    }

    /// Mock POST /orgs/{org}/projects returning a project with `id`.
    pub async fn create_project(&self, id: u64) {
        Mock::given(method("POST"))
            .and(path(format!("{}/projects", self.base())))
            .respond_with(move |req: &Request| {
                let body: serde_json::Value = req.body_json().unwrap_or_default();
                let name = body["name"].as_str().unwrap_or("project");
                ResponseTemplate::new(201).set_body_json(mock_project(id, name))
            })
            .mount(self.server)
            .await;
    }

    /// Mock POST /projects/{id}/columns, echoing the column name.
    pub async fn create_column(&self, project_id: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/projects/{project_id}/columns")))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = req.body_json().unwrap_or_default();
                let name = body["name"].as_str().unwrap_or("column");
                ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": name}))
            })
            .mount(self.server)
            .await;
    }
}

/// Builder for mocking organization info endpoints.
pub struct MockOrgInfoBuilder<'a> {
    server: &'a MockServer,
    login: &'a str,
    plan: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> MockOrgInfoBuilder<'a> {
    pub fn plan(mut self, plan: &'a str) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    fn body(&self) -> serde_json::Value {
        json!({
            "login": self.login,
            "id": 1,
            "name": format!("{} Org", self.login),
            "description": self.description,
            "public_repos": 2,
            "total_private_repos": 3,
            "plan": self.plan.map(|name| json!({"name": name}))
        })
    }

    /// Mount mock for GET /orgs/{org}.
    pub async fn get(self) {
        Mock::given(method("GET"))
            .and(path(format!("/orgs/{}", self.login)))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.body()))
            .mount(self.server)
            .await;
    }

    /// Mount mock for PATCH /orgs/{org} expecting the description.
    pub async fn update(self, description: &str) {
        Mock::given(method("PATCH"))
            .and(path(format!("/orgs/{}", self.login)))
            .and(body_json(json!({"description": description})))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.body()))
            .mount(self.server)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::github::RepoClient;

    #[tokio::test]
    async fn mock_server_returns_repository_info() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo").repo_info().get().await;

        let repo = mock.client().get_repo("owner", "repo").await.unwrap();
        assert!(!repo.private);
    }

    #[tokio::test]
    async fn mock_server_counts_received_requests() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo").repo_info().get().await;

        let client = mock.client();
        client.get_repo("owner", "repo").await.unwrap();
        client.get_repo("owner", "repo").await.unwrap();

        assert_eq!(mock.received("GET", "/repos/owner/repo").await, 2);
        assert_eq!(mock.received("PATCH", "/repos/owner/repo").await, 0);
    }
}
