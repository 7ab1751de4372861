//! Snapshot of an organization's teams, repositories and projects.

use crate::infra::github::GitHubApi;
use crate::infra::github::models::{Project, Repository, Team};
use crate::shared::config::{OrganizationConfig, TeamSpec};

use super::error::Result;

pub(crate) struct Inventory {
    pub teams: Vec<Team>,
    pub repositories: Vec<Repository>,
    pub projects: Vec<Project>,
}

impl Inventory {
    pub async fn fetch(client: &dyn GitHubApi, org: &str) -> Result<Self> {
        let teams = client.list_teams(org).await?;
        let repositories = client.list_org_repos(org).await?;
        let projects = client.list_projects(org).await?;
        tracing::debug!(
            org,
            teams = teams.len(),
            repositories = repositories.len(),
            projects = projects.len(),
            "fetched organization inventory"
        );
        Ok(Self {
            teams,
            repositories,
            projects,
        })
    }

    /// A team matches by display name or by the slug derived from it.
    pub fn has_team(&self, spec: &TeamSpec) -> bool {
        let slug = spec.slug();
        self.teams
            .iter()
            .any(|t| t.name == spec.name || t.slug == slug)
    }

    pub fn has_repository(&self, name: &str) -> bool {
        self.repositories.iter().any(|r| r.name == name)
    }

    pub fn has_project(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p.name == name)
    }

    /// Configured items absent from the organization, per kind.
    pub fn missing(&self, expected: &OrganizationConfig) -> Missing {
        Missing {
            teams: expected
                .teams
                .iter()
                .filter(|t| !self.has_team(t))
                .map(TeamSpec::slug)
                .collect(),
            repositories: expected
                .repository_settings
                .keys()
                .filter(|name| !self.has_repository(name))
                .cloned()
                .collect(),
            projects: expected
                .projects
                .keys()
                .filter(|name| !self.has_project(name))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Missing {
    pub teams: Vec<String>,
    pub repositories: Vec<String>,
    pub projects: Vec<String>,
}

impl Missing {
    pub fn recommendations(&self) -> Vec<String> {
        [
            ("teams", &self.teams),
            ("repositories", &self.repositories),
            ("projects", &self.projects),
        ]
        .into_iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(kind, names)| format!("Missing {kind}: {}", names.join(", ")))
        .collect()
    }
}
