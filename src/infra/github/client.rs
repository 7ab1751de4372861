//! GitHub REST client on top of reqwest.
//!
//! Token resolution order: `GITHUB_TOKEN`, `GH_TOKEN`, `GITHUB_TOKEN` from the
//! nearest `.env` file, then `gh auth token`.

use std::path::PathBuf;
use std::process::Command;

use anyhow::Context;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{GitHubError, RateLimitHeaders, Result};
use crate::shared::config::Config;
use crate::shared::env_file::EnvFile;
use crate::shared::env_var::EnvVars;

const API_VERSION: &str = "2022-11-28";

/// Characters left unescaped in a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one URL path segment (branch names may contain `/`).
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Where the token in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    EnvFile(PathBuf),
    GhCli,
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::EnvFile(path) => write!(f, "{}", path.display()),
            Self::GhCli => write!(f, "gh auth token"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

/// Resolve a token from the process environment, `.env` and the GitHub CLI.
pub fn resolve_token() -> Option<ResolvedToken> {
    let env = EnvVars::load();
    let env_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| match EnvFile::discover(&cwd) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable .env file");
                None
            }
        });
    resolve_token_from(&env, env_file.as_ref(), get_gh_token)
}

pub(crate) fn resolve_token_from(
    env: &EnvVars,
    env_file: Option<&EnvFile>,
    gh_token: impl FnOnce() -> Result<String>,
) -> Option<ResolvedToken> {
    if let Some(value) = &env.github_token {
        return Some(ResolvedToken {
            value: value.clone(),
            source: TokenSource::Environment,
        });
    }

    if let Some(file) = env_file {
        if let Some(value) = file.get(EnvVars::github_token_name()) {
            return Some(ResolvedToken {
                value: value.to_string(),
                source: TokenSource::EnvFile(file.path.clone()),
            });
        }
    }

    match gh_token() {
        Ok(value) => Some(ResolvedToken {
            value,
            source: TokenSource::GhCli,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "no token from gh CLI");
            None
        }
    }
}

/// Get GitHub token from `gh auth token` command.
/// This reuses the authentication from GitHub CLI.
fn get_gh_token() -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("Failed to run gh auth token")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitHubError::TokenError(format!("gh auth token failed: {stderr}")).into());
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(
            GitHubError::TokenError("gh auth token returned empty token".to_string()).into(),
        );
    }

    Ok(token)
}

/// Minimal GitHub REST client. Anonymous when no token is available.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: Option<String>, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid user agent")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Client for the configured API URL, authenticated when a token resolves.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = resolve_token().map(|t| t.value);
        Self::new(&config.github.api_url, token, &config.github.user_agent)
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        Self::new(base_url, Some(token.to_string()), "ghops-test")
    }

    #[cfg(test)]
    pub fn anonymous(base_url: &str) -> Result<Self> {
        Self::new(base_url, None, "ghops-test")
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Fail early for commands that write to GitHub.
    pub fn require_token(&self) -> Result<()> {
        if self.has_token() {
            Ok(())
        } else {
            Err(GitHubError::MissingToken.into())
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request(Method::GET, path, query, None).await
    }

    pub(crate) async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.request(method, path, &[], Some(body)).await
    }

    /// Issue a request and decode the JSON response.
    ///
    /// An empty or 204 response decodes as JSON `null`, so `T = ()` works for
    /// endpoints without a body.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(GitHubError::from)?;
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "github request");

        let rate_limit = rate_limit_headers(response.headers());
        let text = response.text().await.map_err(GitHubError::from)?;

        if !status.is_success() {
            return Err(GitHubError::from_response(status.as_u16(), &text, rate_limit).into());
        }

        let payload = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };
        serde_json::from_str(payload).map_err(|source| {
            GitHubError::Parse {
                path: path.to_string(),
                source,
            }
            .into()
        })
    }
}

fn rate_limit_headers(headers: &HeaderMap) -> Option<RateLimitHeaders> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };
    Some(RateLimitHeaders {
        remaining: read("x-ratelimit-remaining")?,
        limit: read("x-ratelimit-limit")?,
    })
}
