//! Organization report written as pretty JSON.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use serde::Serialize;

use crate::infra::github::GitHubApi;
use crate::infra::github::models::{Organization, Project, Repository, Team};
use crate::shared::config::OrganizationConfig;

use super::error::{Result, write_file};
use super::inventory::Inventory;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ReportArgs {
    /// Where to write the JSON report
    #[arg(long, default_value = "reports/organization-report.json")]
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrganizationSummary {
    pub name: String,
    pub login: String,
    pub description: Option<String>,
    pub public_repos: u64,
    pub private_repos: Option<u64>,
    pub plan: Option<String>,
}

impl From<&Organization> for OrganizationSummary {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.display_name().to_string(),
            login: org.login.clone(),
            description: org.description.clone(),
            public_repos: org.public_repos,
            private_repos: org.total_private_repos,
            plan: org.plan.as_ref().map(|p| p.name.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TeamEntry {
    pub name: String,
    pub slug: String,
    pub privacy: Option<String>,
    pub description: Option<String>,
}

impl From<&Team> for TeamEntry {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            slug: team.slug.clone(),
            privacy: team.privacy.clone(),
            description: team.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RepositoryEntry {
    pub name: String,
    pub private: bool,
    pub description: Option<String>,
    pub topics: Vec<String>,
    pub default_branch: Option<String>,
}

impl From<&Repository> for RepositoryEntry {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            private: repo.private,
            description: repo.description.clone(),
            topics: repo.topics.clone(),
            default_branch: repo.default_branch.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectEntry {
    pub name: String,
    pub description: Option<String>,
    pub state: Option<String>,
}

impl From<&Project> for ProjectEntry {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.body.clone(),
            state: project.state.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrgReport {
    pub timestamp: String,
    pub organization: OrganizationSummary,
    pub teams: Vec<TeamEntry>,
    pub repositories: Vec<RepositoryEntry>,
    pub projects: Vec<ProjectEntry>,
    pub recommendations: Vec<String>,
}

impl OrgReport {
    pub fn build(
        org: &Organization,
        inventory: &Inventory,
        expected: &OrganizationConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            organization: org.into(),
            teams: inventory.teams.iter().map(Into::into).collect(),
            repositories: inventory.repositories.iter().map(Into::into).collect(),
            projects: inventory.projects.iter().map(Into::into).collect(),
            recommendations: inventory.missing(expected).recommendations(),
        }
    }

    fn summary(&self, output: &Path) -> Vec<String> {
        vec![
            format!("✅ Report generated and saved to {}", output.display()),
            String::new(),
            "📋 Summary:".to_string(),
            format!("   Organization: {}", self.organization.name),
            format!("   Teams: {}", self.teams.len()),
            format!("   Repositories: {}", self.repositories.len()),
            format!("   Projects: {}", self.projects.len()),
        ]
    }
}

pub(crate) async fn generate(
    client: &dyn GitHubApi,
    org: &str,
    expected: &OrganizationConfig,
    args: &ReportArgs,
) -> Result<OrgReport> {
    println!("📊 Generating comprehensive report...\n");
    let info = client.get_org(org).await?;
    let inventory = Inventory::fetch(client, org).await?;
    let report = OrgReport::build(&info, &inventory, expected, Utc::now());

    write_file(&args.output, &serde_json::to_string_pretty(&report)?)?;
    tracing::info!(path = %args.output.display(), "organization report written");
    println!("{}", report.summary(&args.output).join("\n"));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::github::mock::GitHubMockServer;
    use tempfile::TempDir;

    async fn mock_org(mock: &GitHubMockServer) {
        let org = mock.org("acme");
        org.info().plan("free").description("Treasury tools").get().await;
        org.teams(&["core-developers"]).await;
        org.repos(&["dashboard"]).await;
        org.projects(&["community-management"]).await;
    }

    #[tokio::test]
    async fn writes_report_with_recommendations() {
        let mock = GitHubMockServer::start().await;
        mock_org(&mock).await;
        let dir = TempDir::new().unwrap();
        let args = ReportArgs {
            output: dir.path().join("reports/organization-report.json"),
        };

        let report = generate(&mock.client(), "acme", &OrganizationConfig::default(), &args)
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&args.output).unwrap()).unwrap();
        assert_eq!(written["organization"]["name"], "acme Org");
        assert_eq!(written["organization"]["private_repos"], 3);
        assert_eq!(written["organization"]["plan"], "free");
        assert_eq!(written["teams"][0]["slug"], "core-developers");
        assert_eq!(written["repositories"][0]["topics"][0], "bitcoin");
        assert_eq!(written["projects"][0]["state"], "open");
        assert_eq!(written["recommendations"].as_array().unwrap().len(), 3);
        assert!(report.recommendations[0].starts_with("Missing teams: partners"));
    }

    #[tokio::test]
    async fn top_level_failure_writes_nothing() {
        let mock = GitHubMockServer::start().await;
        let dir = TempDir::new().unwrap();
        let args = ReportArgs {
            output: dir.path().join("report.json"),
        };

        let result = generate(&mock.client(), "acme", &OrganizationConfig::default(), &args).await;

        assert!(result.is_err());
        assert!(!args.output.exists());
    }

    #[test]
    fn summary_names_output_path() {
        let report = OrgReport {
            timestamp: String::new(),
            organization: OrganizationSummary {
                name: "Acme".to_string(),
                login: "acme".to_string(),
                description: None,
                public_repos: 0,
                private_repos: None,
                plan: None,
            },
            teams: Vec::new(),
            repositories: Vec::new(),
            projects: Vec::new(),
            recommendations: Vec::new(),
        };

        let lines = report.summary(Path::new("out/report.json"));

        assert_eq!(lines[0], "✅ Report generated and saved to out/report.json");
        assert_eq!(lines[3], "   Organization: Acme");
    }
}
