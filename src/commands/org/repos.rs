//! Apply configured settings, topics and branch protection to repositories.

use crate::infra::github::GitHubApi;
use crate::infra::github::models::{
    BranchProtection, RepoSettings, RequiredReviews, RequiredStatusChecks,
};
use crate::shared::config::{BranchProtectionConfig, OrganizationConfig, RepositorySettings};

use super::error::Result;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RepoSetup {
    pub updated: Vec<String>,
    pub protected: Vec<String>,
    pub missing: Vec<String>,
    pub failures: usize,
}

fn patch_body(settings: &RepositorySettings) -> RepoSettings {
    RepoSettings {
        description: settings.description.clone(),
        private: settings.private,
        allow_squash_merge: settings.allow_squash_merge,
        allow_merge_commit: settings.allow_merge_commit,
        allow_rebase_merge: settings.allow_rebase_merge,
        delete_branch_on_merge: settings.delete_branch_on_merge,
    }
}

fn protection_body(config: &BranchProtectionConfig) -> BranchProtection {
    BranchProtection {
        required_status_checks: RequiredStatusChecks {
            strict: config.strict_status_checks,
            contexts: config.status_check_contexts.clone(),
        },
        enforce_admins: config.enforce_admins,
        required_pull_request_reviews: RequiredReviews {
            required_approving_review_count: config.required_approving_review_count,
            dismiss_stale_reviews: config.dismiss_stale_reviews,
        },
        restrictions: None,
    }
}

async fn update_repository(
    client: &dyn GitHubApi,
    org: &str,
    name: &str,
    settings: &RepositorySettings,
) -> Result<()> {
    client.update_repo(org, name, &patch_body(settings)).await?;
    if !settings.topics.is_empty() {
        client.replace_topics(org, name, &settings.topics).await?;
    }
    Ok(())
}

/// Only repositories that exist in the organization are touched.
pub(crate) async fn setup_repositories(
    client: &dyn GitHubApi,
    org: &str,
    config: &OrganizationConfig,
) -> Result<RepoSetup> {
    println!("📁 Setting up repositories...\n");
    let existing = client.list_org_repos(org).await?;
    let protection = protection_body(&config.branch_protection);

    let mut setup = RepoSetup::default();
    for (name, settings) in &config.repository_settings {
        if !existing.iter().any(|r| &r.name == name) {
            println!("⚠️  Repository {name} not found");
            setup.missing.push(name.clone());
            continue;
        }

        println!("🔄 Updating repository {name}...");
        if let Err(e) = update_repository(client, org, name, settings).await {
            println!("   ⚠️  Could not update {name}: {e}");
            tracing::warn!(org, name, error = %e, "repository update failed");
            setup.failures += 1;
            continue;
        }
        println!("   ✅ Updated {name}");
        setup.updated.push(name.clone());

        if !config.branch_protection.enabled {
            continue;
        }
        let branch = settings.protected_branch();
        match client
            .set_branch_protection(org, name, branch, &protection)
            .await
        {
            Ok(()) => {
                println!("   ✅ Set up branch protection for {name}");
                setup.protected.push(name.clone());
            }
            Err(e) => {
                println!("   ⚠️  Could not set up branch protection for {name}: {e}");
                tracing::warn!(org, name, branch, error = %e, "branch protection failed");
                setup.failures += 1;
            }
        }
    }

    tracing::info!(
        org,
        updated = setup.updated.len(),
        protected = setup.protected.len(),
        missing = setup.missing.len(),
        failures = setup.failures,
        "repository setup finished"
    );
    println!("\n✅ Repository setup complete!");
    Ok(setup)
}
