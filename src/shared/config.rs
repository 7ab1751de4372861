use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::dirs;
use super::env_var::EnvVars;

/// Top-level configuration for ghops.
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub API connection settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Repository aliases accepted by `--repo`, keyed by alias.
    #[serde(default = "default_repositories")]
    pub repositories: BTreeMap<String, RepositoryEntry>,

    /// Build monitor settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Completion polling settings.
    #[serde(default)]
    pub wait: WaitConfig,

    /// Commands suggested when analyzing failed builds.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Desired organization state used by `ghops org`.
    #[serde(default)]
    pub organization: OrganizationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            repositories: default_repositories(),
            monitor: MonitorConfig::default(),
            wait: WaitConfig::default(),
            analysis: AnalysisConfig::default(),
            organization: OrganizationConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API base URL (default: "https://api.github.com").
    pub api_url: String,
    /// Organization owning the managed repositories.
    pub organization: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            organization: "MyBitcoinFuture".to_string(),
            user_agent: concat!("ghops/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RepositoryEntry {
    /// Repository name within the organization.
    pub name: String,
    /// Workflow files checked by `builds status`.
    #[serde(default)]
    pub workflows: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Re-check interval for `builds status --watch`.
    pub interval_secs: u64,
    /// Runs listed per workflow by `builds status`.
    pub run_limit: u32,
    /// Re-check interval for `builds watch`.
    pub watch_interval_secs: u64,
    /// Runs inspected per repository by `builds watch`.
    pub watch_run_limit: u32,
    /// Repository aliases watched when `--repos` is omitted.
    pub watch_repositories: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            run_limit: 5,
            watch_interval_secs: 300,
            watch_run_limit: 3,
            watch_repositories: vec!["dashboard".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WaitConfig {
    /// Delay between polls of a running workflow.
    pub interval_secs: u64,
    /// Give up waiting for completion after this many seconds.
    pub timeout_secs: u64,
    /// Pause after dispatching a workflow before looking for its run.
    pub start_delay_secs: u64,
    /// Give up looking for a freshly dispatched run after this many seconds.
    pub start_timeout_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            timeout_secs: 300,
            start_delay_secs: 5,
            start_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub test_command: String,
    pub build_command: String,
    pub lint_command: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            test_command: "npm test".to_string(),
            build_command: "npm run build".to_string(),
            lint_command: "npm run lint:fix".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    /// Organization profile description set by `org professionalize`.
    pub description: String,
    pub teams: Vec<TeamSpec>,
    /// Repository settings keyed by repository name.
    pub repository_settings: BTreeMap<String, RepositorySettings>,
    pub branch_protection: BranchProtectionConfig,
    /// Classic project boards keyed by project name.
    pub projects: BTreeMap<String, ProjectSpec>,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            description: "Professional Bitcoin treasury management platform for organizations. \
                Secure, scalable, and open-source solutions for enterprise Bitcoin adoption."
                .to_string(),
            teams: default_teams(),
            repository_settings: default_repository_settings(),
            branch_protection: BranchProtectionConfig::default(),
            projects: default_projects(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TeamSpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub privacy: TeamPrivacy,
    /// Permission granted on each repository, keyed by repository name.
    #[serde(default)]
    pub permissions: BTreeMap<String, Permission>,
}

impl TeamSpec {
    /// The slug GitHub derives from the team name: lowercase, with each run
    /// of other characters collapsed into one `-`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamPrivacy {
    Secret,
    #[default]
    Closed,
}

impl TeamPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Closed => "closed",
        }
    }
}

/// Repository permission level granted to a team.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Triage => "triage",
            Self::Push => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositorySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Repository visibility; left untouched when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    pub topics: Vec<String>,
    /// Branch that receives branch protection (default: "main").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
}

impl RepositorySettings {
    pub fn protected_branch(&self) -> &str {
        self.default_branch.as_deref().unwrap_or("main")
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BranchProtectionConfig {
    /// Apply branch protection during `org setup-repos`.
    pub enabled: bool,
    /// Require branches to be up to date before merging.
    pub strict_status_checks: bool,
    pub status_check_contexts: Vec<String>,
    pub enforce_admins: bool,
    pub required_approving_review_count: u32,
    pub dismiss_stale_reviews: bool,
}

impl Default for BranchProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict_status_checks: true,
            status_check_contexts: Vec::new(),
            enforce_admins: true,
            required_approving_review_count: 1,
            dismiss_stale_reviews: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectSpec {
    pub description: String,
    /// Board columns, created in order.
    #[serde(default)]
    pub columns: Vec<String>,
}

/// An `owner/name` pair resolved from a CLI repository argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Config {
    /// Resolve a repository argument: `owner/repo`, a configured alias, or a
    /// bare repository name in the configured organization.
    pub fn resolve_repo(&self, input: &str) -> anyhow::Result<RepoRef> {
        if input.contains('/') {
            let parts: Vec<&str> = input.split('/').collect();
            return match parts.as_slice() {
                [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepoRef {
                    owner: owner.to_string(),
                    name: name.to_string(),
                }),
                _ => Err(ConfigError::InvalidRepository(input.to_string()).into()),
            };
        }
        if input.is_empty() {
            return Err(ConfigError::InvalidRepository(input.to_string()).into());
        }

        let name = self
            .repositories
            .get(input)
            .map_or(input, |entry| entry.name.as_str());
        Ok(RepoRef {
            owner: self.github.organization.clone(),
            name: name.to_string(),
        })
    }

    /// Workflows configured for an alias (empty for unknown aliases).
    pub fn workflows_for(&self, alias: &str) -> &[String] {
        self.repositories
            .get(alias)
            .map_or(&[], |entry| entry.workflows.as_slice())
    }

    /// Apply environment overrides on top of the file values.
    pub fn apply_env(&mut self, env: &EnvVars) {
        if let Some(url) = &env.api_url {
            self.github.api_url = url.clone();
        }
    }
}

fn default_repositories() -> BTreeMap<String, RepositoryEntry> {
    let entry = |name: &str, workflows: &[&str]| {
        (
            name.to_string(),
            RepositoryEntry {
                name: name.to_string(),
                workflows: workflows.iter().map(|w| w.to_string()).collect(),
            },
        )
    };
    BTreeMap::from([
        entry(
            "dashboard",
            &["ci.yml", "branded-installer-ci.yml", "release.yml"],
        ),
        entry("website", &["ci.yml", "deploy.yml", "static.yml"]),
        entry("plugins", &["plugin-ci.yml", "repository-dispatch.yml"]),
        entry(
            "private-plugins",
            &["plugin-ci.yml", "repository-dispatch.yml"],
        ),
        entry("platform-manifests", &[]),
    ])
}

fn default_teams() -> Vec<TeamSpec> {
    const ALL_REPOS: [&str; 5] = [
        "dashboard",
        "plugins",
        "private-plugins",
        "platform-manifests",
        "website",
    ];
    let team = |name: &str, description: &str, grants: &[(&str, Permission)]| TeamSpec {
        name: name.to_string(),
        description: description.to_string(),
        privacy: TeamPrivacy::Closed,
        permissions: grants
            .iter()
            .map(|(repo, permission)| (repo.to_string(), *permission))
            .collect(),
    };
    let everything = |permission: Permission| -> Vec<(&str, Permission)> {
        ALL_REPOS.iter().map(|repo| (*repo, permission)).collect()
    };

    vec![
        team(
            "core-developers",
            "Core development team with full repository access and administrative privileges",
            &everything(Permission::Admin),
        ),
        team(
            "partners",
            "Strategic partners with limited access to specific repositories for collaboration",
            &[("dashboard", Permission::Pull), ("plugins", Permission::Pull)],
        ),
        team(
            "beta-testers",
            "Beta testing team for private plugins and early access features",
            &[("private-plugins", Permission::Pull)],
        ),
        team(
            "community-contributors",
            "Community members contributing to open source components",
            &[("plugins", Permission::Pull), ("website", Permission::Pull)],
        ),
        team(
            "advisory-board",
            "Strategic advisors with read-only access to all repositories",
            &everything(Permission::Pull),
        ),
    ]
}

fn default_repository_settings() -> BTreeMap<String, RepositorySettings> {
    let settings = |description: &str, private: Option<bool>, topics: &[&str]| RepositorySettings {
        description: Some(description.to_string()),
        private,
        topics: topics.iter().map(|t| t.to_string()).collect(),
        default_branch: Some("main".to_string()),
        allow_squash_merge: Some(true),
        allow_merge_commit: Some(true),
        allow_rebase_merge: Some(false),
        delete_branch_on_merge: Some(true),
    };

    BTreeMap::from([
        (
            "dashboard".to_string(),
            settings(
                "Main Bitcoin treasury management application with xpub-only architecture and enterprise-grade security",
                Some(true),
                &[
                    "bitcoin", "treasury", "xpub", "nodejs", "react", "electron", "enterprise",
                    "security", "open-source",
                ],
            ),
        ),
        (
            "website".to_string(),
            settings(
                "Landing page and comprehensive documentation for the MyBitcoinFuture platform",
                Some(false),
                &[
                    "documentation", "landing-page", "bitcoin", "open-source", "docs", "marketing",
                ],
            ),
        ),
        (
            "plugins".to_string(),
            settings(
                "Open-source plugin ecosystem for extending MyBitcoinFuture platform functionality",
                Some(true),
                &["plugins", "bitcoin", "open-source", "ecosystem", "extensions", "modular"],
            ),
        ),
        (
            "private-plugins".to_string(),
            settings(
                "Private plugin ecosystem and premium features for enterprise customers",
                Some(true),
                &["plugins", "bitcoin", "premium", "private", "enterprise", "commercial"],
            ),
        ),
        (
            "platform-manifests".to_string(),
            settings(
                "Deployment configurations and manifests for various platforms and environments",
                Some(false),
                &[
                    "deployment", "docker", "kubernetes", "platform", "manifests", "devops",
                    "infrastructure",
                ],
            ),
        ),
        (
            ".github".to_string(),
            RepositorySettings {
                description: Some(
                    "Organization-wide templates, workflows, and community management tools"
                        .to_string(),
                ),
                topics: [
                    "templates", "workflows", "community", "organization", "automation", "ci-cd",
                ]
                .iter()
                .map(|t| t.to_string())
                .collect(),
                ..RepositorySettings::default()
            },
        ),
    ])
}

fn default_projects() -> BTreeMap<String, ProjectSpec> {
    let project = |name: &str, description: &str, columns: &[&str]| {
        (
            name.to_string(),
            ProjectSpec {
                description: description.to_string(),
                columns: columns.iter().map(|c| c.to_string()).collect(),
            },
        )
    };
    BTreeMap::from([
        project(
            "marketplace-launch-pipeline",
            "Marketplace launch pipeline for Umbrel/Start9 submissions",
            &[
                "Backlog",
                "In Development",
                "Testing",
                "Marketplace Review",
                "Published",
            ],
        ),
        project(
            "plugin-development-roadmap",
            "Plugin development roadmap and progress tracking",
            &["Planning", "Development", "Testing", "Release"],
        ),
        project(
            "partnership-coordination",
            "Partnership coordination and integration tracking",
            &["Discussion", "Development", "Testing", "Integration", "Launch"],
        ),
        project(
            "community-management",
            "Community management and engagement tracking",
            &[
                "New Issues",
                "Triage",
                "In Progress",
                "Community Review",
                "Resolved",
            ],
        ),
    ])
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid repository: {0}. Expected an alias, a name, or owner/repo")]
    InvalidRepository(String),
}

/// Load configuration from an explicit path, or from
/// `~/.config/ghops/config.ya?ml` when no path is given.
/// Returns Config::default() if no config file exists in the default location.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_config(&content, path);
    }

    let Some(dir) = dirs::app_config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir)
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    tracing::debug!(path = %path.display(), "parsing config");
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
