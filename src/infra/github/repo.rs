//! Repository operations.

use reqwest::Method;
use serde_json::json;

use super::client::{GitHubClient, encode_segment};
use super::error::Result;
use super::models::{BranchProtection, RepoSettings, Repository};

/// Trait for repository operations.
#[async_trait::async_trait]
pub trait RepoClient: Send + Sync {
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<Repository>;

    async fn update_repo(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepoSettings,
    ) -> Result<Repository>;

    /// Replace the full topic list (`PUT .../topics`).
    async fn replace_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()>;

    async fn set_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        protection: &BranchProtection,
    ) -> Result<()>;
}

fn repo_path(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}", encode_segment(owner), encode_segment(repo))
}

#[async_trait::async_trait]
impl RepoClient for GitHubClient {
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.get(&repo_path(owner, repo), &[]).await
    }

    async fn update_repo(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepoSettings,
    ) -> Result<Repository> {
        self.send(Method::PATCH, &repo_path(owner, repo), settings)
            .await
    }

    async fn replace_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()> {
        let path = format!("{}/topics", repo_path(owner, repo));
        let _: serde_json::Value = self
            .send(Method::PUT, &path, &json!({ "names": topics }))
            .await?;
        Ok(())
    }

    async fn set_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        protection: &BranchProtection,
    ) -> Result<()> {
        let path = format!(
            "{}/branches/{}/protection",
            repo_path(owner, repo),
            encode_segment(branch)
        );
        let _: serde_json::Value = self.send(Method::PUT, &path, protection).await?;
        Ok(())
    }
}
