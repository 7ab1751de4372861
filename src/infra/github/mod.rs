//! Minimal GitHub REST client.
//!
//! Covers only the endpoints ghops calls. Each concern is a trait implemented
//! by `GitHubClient`, so commands can take `&dyn GitHubApi` and tests can
//! point the client at `mock::GitHubMockServer`.

mod account;
mod actions;
mod client;
pub(crate) mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod models;
mod org;
mod repo;

pub use account::AccountClient;
pub use actions::{ActionsClient, RunFilter, list_runs_with_fallback};
pub use client::{GitHubClient, TokenSource, resolve_token};
pub use error::{GitHubError, is_not_found};
pub use models::{Conclusion, RunStatus, WorkflowRun};
pub use org::OrgClient;
pub use repo::RepoClient;

/// Everything ghops needs from GitHub.
pub trait GitHubApi: ActionsClient + RepoClient + OrgClient + AccountClient {}

impl<T> GitHubApi for T where T: ActionsClient + RepoClient + OrgClient + AccountClient {}
