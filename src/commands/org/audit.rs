use crate::infra::github::GitHubApi;
use crate::infra::github::models::Organization;

use super::error::Result;
use super::inventory::Inventory;

fn visibility(private: bool) -> &'static str {
    if private { "private" } else { "public" }
}

fn organization_lines(org: &Organization) -> Vec<String> {
    vec![
        "📊 Organization Information:".to_string(),
        format!("   Name: {}", org.display_name()),
        format!("   Login: {}", org.login),
        format!(
            "   Description: {}",
            org.description.as_deref().unwrap_or("No description")
        ),
        format!("   Public Repos: {}", org.public_repos),
        format!(
            "   Private Repos: {}",
            org.total_private_repos
                .map_or_else(|| "N/A".to_string(), |n| n.to_string())
        ),
        format!(
            "   Plan: {}",
            org.plan.as_ref().map_or("Unknown", |p| p.name.as_str())
        ),
        String::new(),
    ]
}

pub(crate) async fn audit(client: &dyn GitHubApi, org: &str) -> Result<Vec<String>> {
    let info = client.get_org(org).await?;
    let inventory = Inventory::fetch(client, org).await?;

    let mut lines = vec![format!("🔍 Auditing {org} organization..."), String::new()];
    lines.extend(organization_lines(&info));

    lines.push("👥 Teams:".to_string());
    for team in &inventory.teams {
        lines.push(format!(
            "   - {} ({}) - {}",
            team.name,
            team.slug,
            team.privacy.as_deref().unwrap_or("unknown")
        ));
    }
    lines.push(String::new());

    lines.push("📁 Repositories:".to_string());
    for repo in &inventory.repositories {
        lines.push(format!(
            "   - {} ({}) - {}",
            repo.name,
            visibility(repo.private),
            repo.description.as_deref().unwrap_or("No description")
        ));
    }
    lines.push(String::new());

    lines.push("📋 Projects:".to_string());
    for project in &inventory.projects {
        lines.push(format!(
            "   - {} - {}",
            project.name,
            project.body.as_deref().unwrap_or("No description")
        ));
    }
    Ok(lines)
}
