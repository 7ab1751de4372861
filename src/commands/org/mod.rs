//! Organization audit, setup, validation and reporting.

mod audit;
mod error;
mod guidance;
mod inventory;
mod professionalize;
mod projects;
mod report;
mod repos;
mod teams;
mod validate;

use clap::Subcommand;

use crate::infra::github::GitHubClient;
use crate::shared::config::Config;

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum OrgCommands {
    /// Print organization info, teams, repositories and projects
    Audit,

    /// Create or update configured teams and grant repository permissions
    SetupTeams,

    /// Apply configured repository settings, topics and branch protection
    SetupRepos,

    /// Create configured project boards and their columns
    SetupProjects,

    /// Print the manual automation checklist
    SetupAutomation,

    /// Print the manual security checklist
    SetupSecurity,

    /// Check that configured teams, repositories and projects exist
    Validate,

    /// Write a JSON report of the organization
    Report(report::ReportArgs),

    /// Update organization and repository descriptions and topics
    Professionalize(professionalize::ProfessionalizeArgs),
}

impl OrgCommands {
    pub async fn run(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::SetupAutomation => {
                println!("{}", guidance::AUTOMATION_CHECKLIST);
                return Ok(());
            }
            Self::SetupSecurity => {
                println!("{}", guidance::SECURITY_CHECKLIST);
                return Ok(());
            }
            _ => {}
        }

        let client = GitHubClient::from_config(config)?;
        client.require_token()?;
        let org = config.github.organization.as_str();
        let expected = &config.organization;

        match self {
            Self::Audit => println!("{}", audit::audit(&client, org).await?.join("\n")),
            Self::SetupTeams => {
                teams::setup_teams(&client, org, &expected.teams).await?;
            }
            Self::SetupRepos => {
                repos::setup_repositories(&client, org, expected).await?;
            }
            Self::SetupProjects => {
                projects::setup_projects(&client, org, &expected.projects).await?;
            }
            Self::Validate => {
                validate::validate(&client, org, expected).await?;
            }
            Self::Report(args) => {
                report::generate(&client, org, expected, args).await?;
            }
            Self::Professionalize(args) => {
                professionalize::run(&client, org, expected, args).await?;
            }
            Self::SetupAutomation | Self::SetupSecurity => {}
        }
        Ok(())
    }
}
