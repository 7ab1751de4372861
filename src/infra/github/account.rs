//! Account-level lookups used by access diagnostics.

use super::client::GitHubClient;
use super::error::Result;
use super::models::{RateLimit, RateLimitResponse, User};

#[async_trait::async_trait]
pub trait AccountClient: Send + Sync {
    /// Core REST rate limit. Available anonymously.
    async fn rate_limit(&self) -> Result<RateLimit>;

    async fn current_user(&self) -> Result<User>;
}

#[async_trait::async_trait]
impl AccountClient for GitHubClient {
    async fn rate_limit(&self) -> Result<RateLimit> {
        let response: RateLimitResponse = self.get("/rate_limit", &[]).await?;
        Ok(response.resources.core)
    }

    async fn current_user(&self) -> Result<User> {
        self.get("/user", &[]).await
    }
}
