// ABOUTME: cPanel UAPI client for version-control sync, deployment, and status.
// ABOUTME: Unwraps the `{status, data, errors}` envelope every UAPI call returns.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http::{ApiClient, ApiRequest};
use crate::types::DeployHandle;

use super::DeployTarget;
use super::error::TargetError;
use super::snapshot::{DeploymentCreated, DeploymentSnapshot, SyncResult, deserialize_flag};

const VERSION_CONTROL: (&str, &str) = ("VersionControl", "update");
const DEPLOYMENT_CREATE: (&str, &str) = ("VersionControlDeployment", "create");
// Custom module: the built-in deployment listing cannot filter on a deploy id.
const DEPLOY_STATUS: (&str, &str) = ("VCDeployStatus", "retrieve");

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(deserialize_with = "deserialize_flag")]
    status: bool,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// UAPI client authenticated with an API token.
#[derive(Debug, Clone)]
pub struct CpanelClient {
    api: ApiClient,
    base_url: String,
    authorization: SecretString,
}

impl CpanelClient {
    pub fn new(api: ApiClient, base_url: &str, user: &str, token: &SecretString) -> Self {
        let authorization =
            SecretString::from(format!("cpanel {}:{}", user, token.expose_secret()));
        Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
        }
    }

    /// Call `module/function`. POST with a form body when fields are given, GET otherwise.
    async fn execute<T: DeserializeOwned>(
        &self,
        (module, function): (&'static str, &'static str),
        fields: Vec<(String, String)>,
        query: Vec<(String, String)>,
    ) -> Result<T, TargetError> {
        let url = format!("{}/execute/{}/{}", self.base_url, module, function);
        let mut request = if fields.is_empty() {
            ApiRequest::get(url)
        } else {
            ApiRequest::post(url).form(fields)
        };
        request = request.secret_header("authorization", &self.authorization)?;
        request.query = query;

        let response = self.api.send(request).await?;
        let envelope: Envelope = serde_json::from_value(response.body.clone())
            .map_err(|source| TargetError::Envelope {
                module,
                function,
                source,
            })?;

        if !envelope.status {
            if !self.api.is_verbose() {
                response.log_failure_body();
            }
            return Err(TargetError::ApiLogical {
                module,
                function,
                errors: envelope.errors.unwrap_or_default(),
            });
        }

        serde_json::from_value(envelope.data).map_err(|source| TargetError::Envelope {
            module,
            function,
            source,
        })
    }
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl DeployTarget for CpanelClient {
    async fn sync_repository(
        &self,
        repository_root: &str,
        branch: &str,
    ) -> Result<SyncResult, TargetError> {
        self.execute(
            VERSION_CONTROL,
            fields(&[("repository_root", repository_root), ("branch", branch)]),
            Vec::new(),
        )
        .await
    }

    async fn create_deployment(
        &self,
        repository_root: &str,
    ) -> Result<DeploymentCreated, TargetError> {
        self.execute(
            DEPLOYMENT_CREATE,
            fields(&[("repository_root", repository_root)]),
            Vec::new(),
        )
        .await
    }

    async fn deployment_status(
        &self,
        handle: &DeployHandle,
    ) -> Result<DeploymentSnapshot, TargetError> {
        self.execute(
            DEPLOY_STATUS,
            Vec::new(),
            fields(&[("deploy_id", handle.as_str())]),
        )
        .await
    }
}

