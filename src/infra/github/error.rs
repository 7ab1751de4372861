//! GitHub API error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to get GitHub token: {0}")]
    TokenError(String),

    #[error(
        "A GitHub token is required for this command. Set GITHUB_TOKEN, add it to a .env file, or run `gh auth login`"
    )]
    MissingToken,

    #[error(
        "GitHub API error: {} - {}{}{}",
        .status,
        .message,
        .details,
        format_rate_limit(.rate_limit.as_ref())
    )]
    Api {
        status: u16,
        message: String,
        /// Pre-rendered `errors[]` entries, e.g. " [name is already_exists]".
        details: String,
        rate_limit: Option<RateLimitHeaders>,
    },

    #[error("Failed to parse response from {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// `x-ratelimit-remaining` / `x-ratelimit-limit` from a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub remaining: u64,
    pub limit: u64,
}

pub type Result<T> = anyhow::Result<T>;

impl GitHubError {
    /// Build an API error from a non-2xx response body.
    pub(crate) fn from_response(
        status: u16,
        body: &str,
        rate_limit: Option<RateLimitHeaders>,
    ) -> Self {
        let json: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let message = json
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());
        let details = json
            .as_ref()
            .and_then(|v| v.get("errors"))
            .and_then(|e| e.as_array())
            .map(|errors| format_error_details(errors))
            .unwrap_or_default();

        Self::Api {
            status,
            message,
            details,
            rate_limit,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Whether `err` is a GitHub 404.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GitHubError>()
        .and_then(GitHubError::status)
        == Some(404)
}

fn format_rate_limit(rate_limit: Option<&RateLimitHeaders>) -> String {
    rate_limit
        .map(|r| format!(" (Rate limit: {}/{})", r.remaining, r.limit))
        .unwrap_or_default()
}

/// Format error details from GitHub API errors array.
/// Returns a formatted string like "[field1 is code1, field2 is code2]" or empty string.
fn format_error_details(errors: &[serde_json::Value]) -> String {
    let error_details: Vec<String> = errors
        .iter()
        .filter_map(|e| {
            let field = e.get("field").and_then(|v| v.as_str());
            let code = e.get("code").and_then(|v| v.as_str());
            match (field, code) {
                (Some(f), Some(c)) => Some(format!("{f} is {c}")),
                (Some(f), None) => Some(f.to_string()),
                (None, Some(c)) => Some(c.to_string()),
                (None, None) => None,
            }
        })
        .collect();

    if error_details.is_empty() {
        String::new()
    } else {
        format!(" [{}]", error_details.join(", "))
    }
}
