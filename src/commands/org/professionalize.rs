//! Organization profile: description, repository metadata and README.

use std::path::PathBuf;

use clap::Args;

use crate::infra::github::GitHubApi;
use crate::infra::github::models::RepoSettings;
use crate::shared::config::{OrganizationConfig, RepositorySettings};

use super::error::{Result, write_file};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ProfessionalizeArgs {
    /// Also write an organization README generated from the configuration
    #[arg(long)]
    pub readme: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ProfileUpdate {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

async fn update_metadata(
    client: &dyn GitHubApi,
    org: &str,
    name: &str,
    settings: &RepositorySettings,
) -> Result<()> {
    let body = RepoSettings {
        description: settings.description.clone(),
        ..RepoSettings::default()
    };
    client.update_repo(org, name, &body).await?;
    if !settings.topics.is_empty() {
        client.replace_topics(org, name, &settings.topics).await?;
    }
    Ok(())
}

/// The organization description must update. Repository failures are
/// printed and collected.
pub(crate) async fn update_profile(
    client: &dyn GitHubApi,
    org: &str,
    config: &OrganizationConfig,
) -> Result<ProfileUpdate> {
    println!("🎨 Professionalizing {org} organization");
    println!("============================================");

    println!("\n🏢 Updating organization...");
    client.update_org_description(org, &config.description).await?;
    println!("✅ Organization description updated");

    println!("\n📁 Updating repositories...");
    let mut update = ProfileUpdate::default();
    for (name, settings) in &config.repository_settings {
        println!("📁 Updating {name}:");
        println!(
            "   Description: {}",
            settings.description.as_deref().unwrap_or("")
        );
        println!("   Topics: {}", settings.topics.join(", "));
        match update_metadata(client, org, name, settings).await {
            Ok(()) => {
                println!("✅ {name} updated successfully");
                update.updated.push(name.clone());
            }
            Err(e) => {
                println!("⚠️  Could not update {name}: {e}");
                tracing::warn!(org, name, error = %e, "repository profile update failed");
                update.failed.push(name.clone());
            }
        }
    }

    tracing::info!(
        org,
        updated = update.updated.len(),
        failed = update.failed.len(),
        "profile update finished"
    );
    println!("\n🎉 Repository professionalization complete!");
    println!(
        "📋 Updated {} repositories with professional descriptions and topics",
        update.updated.len()
    );
    Ok(update)
}

/// Organization README built from the configured description, repositories,
/// teams and projects.
pub(crate) fn render_readme(org: &str, config: &OrganizationConfig) -> String {
    let mut lines = vec![
        format!("# {org} Organization"),
        String::new(),
        format!("[![GitHub](https://img.shields.io/badge/GitHub-{org}-blue.svg)](https://github.com/{org})"),
        String::new(),
        "## 🏢 About Us".to_string(),
        String::new(),
        config.description.clone(),
        String::new(),
        "## 📦 Repositories".to_string(),
        String::new(),
    ];
    for (name, settings) in &config.repository_settings {
        let link = format!("**[{name}](https://github.com/{org}/{name})**");
        match settings.description.as_deref() {
            Some(description) => lines.push(format!("- {link} - {description}")),
            None => lines.push(format!("- {link}")),
        }
    }

    if !config.teams.is_empty() {
        lines.push(String::new());
        lines.push("## 👥 Teams".to_string());
        lines.push(String::new());
        for team in &config.teams {
            lines.push(format!("- **{}** - {}", team.name, team.description));
        }
    }

    if !config.projects.is_empty() {
        lines.push(String::new());
        lines.push("## 📋 Projects".to_string());
        lines.push(String::new());
        for (name, project) in &config.projects {
            lines.push(format!("- **{name}** - {}", project.description));
        }
    }

    lines.push(String::new());
    lines.push("## 🤝 Contributing".to_string());
    lines.push(String::new());
    lines.push(format!(
        "See the [contributing guidelines](https://github.com/{org}/.github/blob/main/CONTRIBUTING.md) \
         and the [code of conduct](https://github.com/{org}/.github/blob/main/CODE_OF_CONDUCT.md)."
    ));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!("**Built with ❤️ by the {org} team**"));
    lines.push(String::new());
    lines.join("\n")
}

pub(crate) async fn run(
    client: &dyn GitHubApi,
    org: &str,
    config: &OrganizationConfig,
    args: &ProfessionalizeArgs,
) -> Result<ProfileUpdate> {
    let update = update_profile(client, org, config).await?;

    if let Some(path) = &args.readme {
        println!("\n📝 Creating professional organization README...");
        match write_file(path, &render_readme(org, config)) {
            Ok(()) => {
                println!("✅ Created professional organization README");
                println!("📁 Location: {}", path.display());
            }
            Err(e) => println!("⚠️  Could not create README: {e}"),
        }
    }

    println!("\n🎉 Professionalization complete!");
    println!("📋 Next steps:");
    println!("   1. Review the changes on GitHub");
    println!("   2. Add team members to appropriate teams");
    println!("   3. Set up branch protection rules");
    println!("   4. Configure issue templates");
    Ok(update)
}
