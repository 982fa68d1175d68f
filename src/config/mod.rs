// ABOUTME: Configuration types for a deployment run.
// ABOUTME: Validates raw settings from the environment into a typed DeployConfig.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::codehost::DEFAULT_API_URL;
use crate::deploy::{DEFAULT_BRANCH, DeploymentRequest, PollPolicy};
use crate::error::{Error, Result};
use crate::http::DEFAULT_REQUEST_TIMEOUT;
use crate::types::{RepoSlug, Revision, RootPattern};

/// Public GitHub web root, used for workflow run links.
pub const DEFAULT_WEB_URL: &str = "https://github.com";

/// Unvalidated settings as they arrive from the command line or environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub owner: String,
    pub repository: String,
    pub revision: String,
    pub run_id: String,
    pub environment: String,
    pub github_token: SecretString,
    pub github_api_url: String,
    pub github_web_url: String,
    pub cpanel_api_url: String,
    pub cpanel_repo_pattern: String,
    pub cpanel_user: String,
    pub cpanel_token: SecretString,
    pub branch: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub request_timeout: Duration,
    pub debug: bool,
}

impl Settings {
    /// Settings with every optional value at its default and the required
    /// ones empty.
    pub fn template() -> Self {
        Self {
            owner: String::new(),
            repository: String::new(),
            revision: String::new(),
            run_id: String::new(),
            environment: String::new(),
            github_token: SecretString::from(String::new()),
            github_api_url: DEFAULT_API_URL.to_string(),
            github_web_url: DEFAULT_WEB_URL.to_string(),
            cpanel_api_url: String::new(),
            cpanel_repo_pattern: String::new(),
            cpanel_user: String::new(),
            cpanel_token: SecretString::from(String::new()),
            branch: DEFAULT_BRANCH.to_string(),
            poll_interval: PollPolicy::DEFAULT_INTERVAL,
            max_polls: PollPolicy::DEFAULT_MAX_POLLS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debug: false,
        }
    }

    /// Validate into a [`DeployConfig`].
    pub fn resolve(self) -> Result<DeployConfig> {
        let required = [
            ("GITHUB_OWNER", self.owner.as_str()),
            ("GITHUB_REPO", self.repository.as_str()),
            ("GITHUB_SHA", self.revision.as_str()),
            ("GITHUB_RUN_ID", self.run_id.as_str()),
            ("CPANEL_ENV", self.environment.as_str()),
            ("CPANEL_API_URL", self.cpanel_api_url.as_str()),
            ("CPANEL_REPO_PATTERN", self.cpanel_repo_pattern.as_str()),
            ("CPANEL_API_USER", self.cpanel_user.as_str()),
            ("GITHUB_API_URL", self.github_api_url.as_str()),
            ("GITHUB_SERVER_URL", self.github_web_url.as_str()),
            ("BRANCH", self.branch.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::MissingEnvVar(name.to_string()));
        }
        if is_blank(&self.github_token) {
            return Err(Error::MissingEnvVar("GITHUB_TOKEN".to_string()));
        }
        if is_blank(&self.cpanel_token) {
            return Err(Error::MissingEnvVar("CPANEL_TOKEN".to_string()));
        }
        if self.max_polls == 0 {
            return Err(Error::InvalidConfig(
                "max polls must be at least 1".to_string(),
            ));
        }
        if !self.run_id.trim().chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidConfig(format!(
                "run id must be numeric, got '{}'",
                self.run_id
            )));
        }

        let repo = RepoSlug::parse_for_owner(&self.repository, &self.owner)?;
        let revision = Revision::new(&self.revision)?;
        let root_pattern = RootPattern::parse(&self.cpanel_repo_pattern)?;

        Ok(DeployConfig {
            repo,
            revision,
            run_id: self.run_id.trim().to_string(),
            environment: self.environment.trim().to_string(),
            github: GitHubConfig {
                api_url: self.github_api_url.trim_end_matches('/').to_string(),
                web_url: self.github_web_url.trim_end_matches('/').to_string(),
                token: self.github_token,
            },
            cpanel: CpanelConfig {
                api_url: self.cpanel_api_url.trim_end_matches('/').to_string(),
                user: self.cpanel_user.trim().to_string(),
                token: self.cpanel_token,
                root_pattern,
            },
            branch: self.branch.trim().to_string(),
            poll: PollPolicy::new(self.poll_interval, self.max_polls),
            request_timeout: self.request_timeout,
            debug: self.debug,
        })
    }
}

fn is_blank(secret: &SecretString) -> bool {
    secret.expose_secret().trim().is_empty()
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub web_url: String,
    pub token: SecretString,
}

#[derive(Debug, Clone)]
pub struct CpanelConfig {
    pub api_url: String,
    pub user: String,
    pub token: SecretString,
    pub root_pattern: RootPattern,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub repo: RepoSlug,
    pub revision: Revision,
    pub run_id: String,
    pub environment: String,
    pub github: GitHubConfig,
    pub cpanel: CpanelConfig,
    pub branch: String,
    pub poll: PollPolicy,
    pub request_timeout: Duration,
    pub debug: bool,
}

impl DeployConfig {
    /// Checkout path on the cPanel server.
    pub fn repository_root(&self) -> String {
        self.cpanel.root_pattern.render(&self.repo)
    }

    /// Link to the workflow run, attached to every status.
    pub fn run_url(&self) -> String {
        format!(
            "{}/{}/actions/runs/{}",
            self.github.web_url, self.repo, self.run_id
        )
    }

    pub fn deployment_request(&self) -> DeploymentRequest {
        DeploymentRequest::new(
            self.revision.clone(),
            self.environment.clone(),
            self.repository_root(),
            self.run_url(),
        )
        .branch(self.branch.clone())
    }
}
