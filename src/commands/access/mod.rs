//! GitHub API access diagnostics.

use clap::Subcommand;
use indoc::indoc;

use crate::infra::github::{GitHubApi, GitHubClient, TokenSource, resolve_token};
use crate::shared::config::Config;
use crate::shared::time::format_local;

const AUTHENTICATED_GUIDANCE: &str = indoc! {"
    ✅ You have a GitHub token set
       This should allow access to private repositories
       Rate limit: 5000 requests/hour"};

const ANONYMOUS_GUIDANCE: &str = indoc! {"
    ⚠️  No GitHub token set
       You can only access public repositories
       Rate limit: 60 requests/hour
       To set a token:
       1. Go to GitHub Settings → Developer settings → Personal access tokens
       2. Create a new token with 'repo' scope for private repos
       3. Export it: export GITHUB_TOKEN=your_token"};

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum AccessCommands {
    /// Check token, rate limit, user and repository access
    Check,
}

impl AccessCommands {
    pub async fn run(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Check => {
                let token = resolve_token();
                let client = GitHubClient::new(
                    &config.github.api_url,
                    token.as_ref().map(|t| t.value.clone()),
                    &config.github.user_agent,
                )?;
                let source = token.map(|t| t.source);
                let report = run_check(config, &client, source.as_ref()).await;
                tracing::info!(
                    rate_limit_ok = report.rate_limit_ok,
                    user = report.user.as_deref(),
                    accessible = report.accessible.len(),
                    inaccessible = report.inaccessible.len(),
                    "access check finished"
                );
                Ok(())
            }
        }
    }
}

/// What the access check observed.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct AccessReport {
    pub rate_limit_ok: bool,
    pub user: Option<String>,
    pub accessible: Vec<String>,
    pub inaccessible: Vec<String>,
}

async fn check_rate_limit(client: &dyn GitHubApi, authenticated: bool) -> bool {
    println!("\n🔍 Testing rate limit...");
    match client.rate_limit().await {
        Ok(limit) => {
            println!("✅ Rate limit info:");
            println!("   Limit: {}", limit.limit);
            println!("   Remaining: {}", limit.remaining);
            println!(
                "   Reset: {}",
                limit
                    .reset_at()
                    .map_or_else(|| limit.reset.to_string(), format_local)
            );
            if authenticated {
                println!("   ✅ Using authenticated access");
            } else {
                println!("   ⚠️  Using unauthenticated access (limited)");
            }
            true
        }
        Err(e) => {
            println!("❌ Error checking rate limit: {e}");
            false
        }
    }
}

async fn check_user(client: &dyn GitHubApi, authenticated: bool) -> Option<String> {
    if !authenticated {
        println!("\n⚠️  No token provided, skipping user test");
        return None;
    }

    println!("\n🔍 Testing user authentication...");
    match client.current_user().await {
        Ok(user) => {
            println!("✅ Authentication successful");
            println!("   User: {}", user.login);
            println!("   Name: {}", user.name.as_deref().unwrap_or("Not set"));
            println!("   Email: {}", user.email.as_deref().unwrap_or("Not public"));
            Some(user.login)
        }
        Err(e) => {
            println!("❌ Authentication failed: {e}");
            None
        }
    }
}

async fn check_repository(client: &dyn GitHubApi, owner: &str, name: &str) -> bool {
    println!("\n🔍 Testing access to {owner}/{name}...");
    let repo = match client.get_repo(owner, name).await {
        Ok(repo) => repo,
        Err(e) => {
            println!("❌ Error accessing repository: {e}");
            tracing::warn!(owner, name, error = %e, "repository not accessible");
            return false;
        }
    };
    println!("✅ Repository is accessible");
    println!("   Name: {}", repo.name);
    println!("   Private: {}", repo.private);
    println!(
        "   Description: {}",
        repo.description.as_deref().unwrap_or("No description")
    );

    println!("\n🔍 Testing workflow access for {owner}/{name}...");
    match client.list_workflows(owner, name).await {
        Ok(workflows) => {
            println!("✅ Workflows are accessible");
            println!("   Total workflows: {}", workflows.total_count);
            if !workflows.workflows.is_empty() {
                println!("   Available workflows:");
                for workflow in &workflows.workflows {
                    println!("     - {} ({})", workflow.name, workflow.path);
                }
            }
        }
        Err(e) => println!("❌ Error accessing workflows: {e}"),
    }
    true
}

/// Run every check. Individual failures are reported, never returned.
pub(crate) async fn run_check(
    config: &Config,
    client: &dyn GitHubApi,
    token_source: Option<&TokenSource>,
) -> AccessReport {
    println!("🚀 GitHub API Access Test");
    println!("========================");
    match token_source {
        Some(source) => println!("✅ GitHub token found in {source}"),
        None => {
            println!("⚠️  No GitHub token found");
            println!("   Set it with: export GITHUB_TOKEN=your_token");
        }
    }
    let authenticated = token_source.is_some();

    let mut report = AccessReport {
        rate_limit_ok: check_rate_limit(client, authenticated).await,
        user: check_user(client, authenticated).await,
        ..Default::default()
    };

    for entry in config.repositories.values() {
        let owner = &config.github.organization;
        if check_repository(client, owner, &entry.name).await {
            report.accessible.push(entry.name.clone());
        } else {
            report.inaccessible.push(entry.name.clone());
        }
    }

    println!("\n📋 Summary:");
    println!("===========");
    if authenticated {
        println!("{AUTHENTICATED_GUIDANCE}");
    } else {
        println!("{ANONYMOUS_GUIDANCE}");
    }
    report
}
