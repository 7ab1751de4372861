//! Create or update configured teams and grant their repository permissions.

use crate::infra::github::GitHubApi;
use crate::infra::github::models::TeamRequest;
use crate::shared::config::TeamSpec;

use super::error::Result;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TeamSetup {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub grants: usize,
    pub failures: usize,
}

fn request(spec: &TeamSpec) -> TeamRequest {
    TeamRequest {
        name: spec.name.clone(),
        description: spec.description.clone(),
        privacy: spec.privacy.as_str().to_string(),
    }
}

async fn grant_permissions(
    client: &dyn GitHubApi,
    org: &str,
    slug: &str,
    spec: &TeamSpec,
    setup: &mut TeamSetup,
) {
    for (repo, permission) in &spec.permissions {
        match client
            .grant_team_repo(org, slug, repo, permission.as_str())
            .await
        {
            Ok(()) => {
                println!(
                    "   ✅ Added {repo} to {slug} with {} permissions",
                    permission.as_str()
                );
                setup.grants += 1;
            }
            Err(e) => {
                println!("   ⚠️  Could not add {repo} to {slug}: {e}");
                tracing::warn!(org, slug, repo, error = %e, "team permission not granted");
                setup.failures += 1;
            }
        }
    }
}

/// Listing existing teams must succeed. Failures on individual teams or
/// grants are printed and counted.
pub(crate) async fn setup_teams(
    client: &dyn GitHubApi,
    org: &str,
    teams: &[TeamSpec],
) -> Result<TeamSetup> {
    println!("👥 Setting up teams...\n");
    let existing = client.list_teams(org).await?;

    let mut setup = TeamSetup::default();
    for spec in teams {
        let known = existing
            .iter()
            .find(|t| t.name == spec.name || t.slug == spec.slug());
        let exists = known.is_some();
        let slug = known.map_or_else(|| spec.slug(), |t| t.slug.clone());
        let result = if exists {
            println!("✅ Team {slug} already exists, updating...");
            client.update_team(org, &slug, &request(spec)).await
        } else {
            println!("🆕 Creating team {slug}...");
            client.create_team(org, &request(spec)).await
        };

        // Grants go to the slug GitHub reports, which may differ from ours.
        let team = match result {
            Ok(team) => team,
            Err(e) => {
                println!("❌ Failed to set up team {slug}: {e}");
                tracing::warn!(org, slug, error = %e, "team setup failed");
                setup.failures += 1;
                continue;
            }
        };

        grant_permissions(client, org, &team.slug, spec, &mut setup).await;
        if exists {
            setup.updated.push(team.slug);
        } else {
            setup.created.push(team.slug);
        }
    }

    tracing::info!(
        org,
        created = setup.created.len(),
        updated = setup.updated.len(),
        grants = setup.grants,
        failures = setup.failures,
        "team setup finished"
    );
    println!("\n✅ Team setup complete!");
    Ok(setup)
}
