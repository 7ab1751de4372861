use crate::infra::github::GitHubApi;
use crate::shared::config::OrganizationConfig;

use super::error::Result;
use super::inventory::{Inventory, Missing};

fn check_line(name: &str, present: bool) -> String {
    if present {
        format!("   ✅ {name} exists")
    } else {
        format!("   ❌ {name} missing")
    }
}

/// One ✅/❌ line per configured team slug, repository and project.
pub(crate) fn validation_lines(inventory: &Inventory, expected: &OrganizationConfig) -> Vec<String> {
    let mut lines = vec!["👥 Team Validation:".to_string()];
    for team in &expected.teams {
        lines.push(check_line(&team.slug(), inventory.has_team(team)));
    }

    lines.push(String::new());
    lines.push("📁 Repository Validation:".to_string());
    for name in expected.repository_settings.keys() {
        lines.push(check_line(name, inventory.has_repository(name)));
    }

    lines.push(String::new());
    lines.push("📋 Project Validation:".to_string());
    for name in expected.projects.keys() {
        lines.push(check_line(name, inventory.has_project(name)));
    }
    lines
}

pub(crate) async fn validate(
    client: &dyn GitHubApi,
    org: &str,
    expected: &OrganizationConfig,
) -> Result<Missing> {
    println!("✅ Validating configuration...\n");
    let inventory = Inventory::fetch(client, org).await?;
    println!("{}", validation_lines(&inventory, expected).join("\n"));
    Ok(inventory.missing(expected))
}
