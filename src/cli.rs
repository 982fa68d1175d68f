// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every deploy input can also come from the environment, as in a CI job.

use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use deploy_relay::codehost::DEFAULT_API_URL;
use deploy_relay::config::{DEFAULT_WEB_URL, Settings};
use deploy_relay::output::OutputMode;
use secrecy::SecretString;

#[derive(Parser)]
#[command(name = "deploy-relay")]
#[command(about = "Deploy a revision through cPanel and mirror its progress to GitHub")]
#[command(version)]
pub struct Cli {
    /// Log every API response body
    #[arg(long, global = true, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Normal)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Normal,
    Quiet,
    Json,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Normal => OutputMode::Normal,
            OutputFormat::Quiet => OutputMode::Quiet,
            OutputFormat::Json => OutputMode::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a revision and report progress as GitHub deployment statuses
    Deploy(DeployArgs),

    /// Show the state of a cPanel deployment
    Status(StatusArgs),
}

#[derive(Args)]
pub struct CpanelArgs {
    /// cPanel base URL, e.g. https://host:2083
    #[arg(long = "cpanel-url", env = "CPANEL_API_URL")]
    pub api_url: String,

    /// cPanel account name
    #[arg(long = "cpanel-user", env = "CPANEL_API_USER")]
    pub user: String,

    /// cPanel API token
    #[arg(long = "cpanel-token", env = "CPANEL_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Timeout for each API request
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub request_timeout: Duration,
}

#[derive(Args)]
pub struct DeployArgs {
    /// Repository owner
    #[arg(long, env = "GITHUB_OWNER")]
    pub owner: String,

    /// Repository in owner/name form
    #[arg(long = "repo", env = "GITHUB_REPO")]
    pub repository: String,

    /// Commit SHA to deploy
    #[arg(long = "sha", env = "GITHUB_SHA")]
    pub revision: String,

    /// Workflow run ID, used to link statuses back to the run
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: String,

    /// GitHub environment name
    #[arg(long, env = "CPANEL_ENV")]
    pub environment: String,

    /// GitHub API token
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// GitHub web root, used for workflow run links
    #[arg(long = "github-url", env = "GITHUB_SERVER_URL", default_value = DEFAULT_WEB_URL)]
    pub github_web_url: String,

    /// Repository root on the server; `{owner}` and `{repo}` are substituted
    #[arg(long = "repo-pattern", env = "CPANEL_REPO_PATTERN")]
    pub repo_pattern: String,

    /// Branch the server checkout is updated to
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Delay between status checks
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub poll_interval: Duration,

    /// Status checks before giving up
    #[arg(long, default_value_t = 60)]
    pub max_polls: u32,

    #[command(flatten)]
    pub cpanel: CpanelArgs,
}

impl DeployArgs {
    pub fn into_settings(self, debug: bool) -> Settings {
        Settings {
            owner: self.owner,
            repository: self.repository,
            revision: self.revision,
            run_id: self.run_id,
            environment: self.environment,
            github_token: SecretString::from(self.github_token),
            github_api_url: self.github_api_url,
            github_web_url: self.github_web_url,
            cpanel_api_url: self.cpanel.api_url,
            cpanel_repo_pattern: self.repo_pattern,
            cpanel_user: self.cpanel.user,
            cpanel_token: SecretString::from(self.cpanel.token),
            branch: self.branch,
            poll_interval: self.poll_interval,
            max_polls: self.max_polls,
            request_timeout: self.cpanel.request_timeout,
            debug,
        }
    }
}

#[derive(Args)]
pub struct StatusArgs {
    /// cPanel deploy ID to look up
    pub deploy_id: String,

    #[command(flatten)]
    pub cpanel: CpanelArgs,
}
