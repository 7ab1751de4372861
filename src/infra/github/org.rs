//! Organization, team and classic project operations.

use reqwest::Method;
use serde_json::json;

use super::client::{GitHubClient, encode_segment};
use super::error::Result;
use super::models::{Organization, Project, ProjectColumn, Repository, Team, TeamRequest};

/// Trait for organization-level operations.
#[async_trait::async_trait]
pub trait OrgClient: Send + Sync {
    async fn get_org(&self, org: &str) -> Result<Organization>;

    async fn update_org_description(&self, org: &str, description: &str) -> Result<Organization>;

    async fn list_teams(&self, org: &str) -> Result<Vec<Team>>;

    async fn create_team(&self, org: &str, team: &TeamRequest) -> Result<Team>;

    async fn update_team(&self, org: &str, slug: &str, team: &TeamRequest) -> Result<Team>;

    /// Grant `permission` on `org/repo` to the team.
    async fn grant_team_repo(
        &self,
        org: &str,
        slug: &str,
        repo: &str,
        permission: &str,
    ) -> Result<()>;

    async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>>;

    async fn list_projects(&self, org: &str) -> Result<Vec<Project>>;

    async fn create_project(&self, org: &str, name: &str, body: &str) -> Result<Project>;

    async fn create_project_column(&self, project_id: u64, name: &str) -> Result<ProjectColumn>;
}

fn org_path(org: &str) -> String {
    format!("/orgs/{}", encode_segment(org))
}

fn per_page() -> [(&'static str, String); 1] {
    [("per_page", "100".to_string())]
}

#[async_trait::async_trait]
impl OrgClient for GitHubClient {
    async fn get_org(&self, org: &str) -> Result<Organization> {
        self.get(&org_path(org), &[]).await
    }

    async fn update_org_description(&self, org: &str, description: &str) -> Result<Organization> {
        self.send(
            Method::PATCH,
            &org_path(org),
            &json!({ "description": description }),
        )
        .await
    }

    async fn list_teams(&self, org: &str) -> Result<Vec<Team>> {
        self.get(&format!("{}/teams", org_path(org)), &per_page())
            .await
    }

    async fn create_team(&self, org: &str, team: &TeamRequest) -> Result<Team> {
        self.send(Method::POST, &format!("{}/teams", org_path(org)), team)
            .await
    }

    async fn update_team(&self, org: &str, slug: &str, team: &TeamRequest) -> Result<Team> {
        let path = format!("{}/teams/{}", org_path(org), encode_segment(slug));
        self.send(Method::PATCH, &path, team).await
    }

    async fn grant_team_repo(
        &self,
        org: &str,
        slug: &str,
        repo: &str,
        permission: &str,
    ) -> Result<()> {
        let path = format!(
            "{}/teams/{}/repos/{}/{}",
            org_path(org),
            encode_segment(slug),
            encode_segment(org),
            encode_segment(repo)
        );
        self.send(Method::PUT, &path, &json!({ "permission": permission }))
            .await
    }

    async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>> {
        self.get(&format!("{}/repos", org_path(org)), &per_page())
            .await
    }

    async fn list_projects(&self, org: &str) -> Result<Vec<Project>> {
        self.get(&format!("{}/projects", org_path(org)), &per_page())
            .await
    }

    async fn create_project(&self, org: &str, name: &str, body: &str) -> Result<Project> {
        self.send(
            Method::POST,
            &format!("{}/projects", org_path(org)),
            &json!({ "name": name, "body": body }),
        )
        .await
    }

    async fn create_project_column(&self, project_id: u64, name: &str) -> Result<ProjectColumn> {
        self.send(
            Method::POST,
            &format!("/projects/{project_id}/columns"),
            &json!({ "name": name }),
        )
        .await
    }
}
