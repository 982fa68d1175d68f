// ABOUTME: GitHub REST client for deployments and deployment statuses.
// ABOUTME: Implements StatusReporter over the shared ApiClient.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::http::{ApiClient, ApiRequest};
use crate::types::{RecordId, RepoSlug, Revision};

use super::error::CodeHostError;
use super::status::StatusReport;
use super::StatusReporter;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Opts into the preview media types that allow the `queued` and
/// `in_progress` states and the `auto_inactive` flag.
const PREVIEW_ACCEPT: &str =
    "application/vnd.github.flash-preview+json, application/vnd.github.ant-man-preview+json";

#[derive(Debug, Deserialize)]
struct DeploymentResponse {
    id: Option<RecordId>,
}

/// GitHub deployments API scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api: ApiClient,
    base_url: String,
    repo: RepoSlug,
    authorization: SecretString,
}

impl GitHubClient {
    pub fn new(api: ApiClient, base_url: &str, repo: RepoSlug, token: &SecretString) -> Self {
        let authorization = SecretString::from(format!("Bearer {}", token.expose_secret()));
        Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
            repo,
            authorization,
        }
    }

    fn deployments_url(&self) -> String {
        format!("{}/repos/{}/deployments", self.base_url, self.repo)
    }

    fn request(&self, request: ApiRequest) -> Result<ApiRequest, CodeHostError> {
        Ok(request
            .secret_header("authorization", &self.authorization)?
            .header("accept", PREVIEW_ACCEPT)?)
    }
}

#[async_trait]
impl StatusReporter for GitHubClient {
    async fn create_deployment_record(
        &self,
        revision: &Revision,
        environment: &str,
    ) -> Result<RecordId, CodeHostError> {
        let request = self.request(ApiRequest::post(self.deployments_url()))?.json(json!({
            "ref": revision.as_str(),
            "task": "deploy",
            "auto_merge": false,
            "environment": environment,
        }));

        let response = self.api.send(request).await?;
        let deployment: DeploymentResponse =
            serde_json::from_value(response.body).map_err(|_| CodeHostError::MissingRecordId)?;
        deployment.id.ok_or(CodeHostError::MissingRecordId)
    }

    async fn post_status(
        &self,
        record: &RecordId,
        report: &StatusReport,
    ) -> Result<(), CodeHostError> {
        let url = format!("{}/{}/statuses", self.deployments_url(), record);
        let request = self.request(ApiRequest::post(url))?.json(json!(report));

        self.api.send(request).await?;
        Ok(())
    }
}
