//! Centralized reader for the environment variables ghops consumes.
//!
//! Variable names are private constants here; other modules read values
//! through the `EnvVars` snapshot.

const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const GH_TOKEN: &str = "GH_TOKEN";
const API_URL: &str = "GHOPS_API_URL";
const LOG: &str = "GHOPS_LOG";
const LOG_FORMAT: &str = "GHOPS_LOG_FORMAT";

/// Snapshot of the process environment at load time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvVars {
    /// `GITHUB_TOKEN`, falling back to `GH_TOKEN` (the GitHub CLI's variable).
    pub github_token: Option<String>,

    /// Overrides `github.api_url` from the config file.
    pub api_url: Option<String>,

    /// `tracing` filter directives (e.g. "debug", "ghops=info").
    pub log: Option<String>,

    /// Log output format: "json" or unset for human-readable text.
    pub log_format: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl EnvVars {
    pub fn load() -> Self {
        Self {
            github_token: non_empty_var(GITHUB_TOKEN).or_else(|| non_empty_var(GH_TOKEN)),
            api_url: non_empty_var(API_URL),
            log: non_empty_var(LOG),
            log_format: non_empty_var(LOG_FORMAT),
        }
    }

    /// Name of the token variable looked up in `.env` files.
    pub fn github_token_name() -> &'static str {
        GITHUB_TOKEN
    }

    pub fn wants_json_logs(&self) -> bool {
        self.log_format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}
