// ABOUTME: Deploy command implementation.
// ABOUTME: Wires the clients together and acts as the error boundary that runs cleanup.

use std::sync::Arc;

use deploy_relay::codehost::GitHubClient;
use deploy_relay::config::DeployConfig;
use deploy_relay::deploy::{self, CleanupRegistry, Outcome};
use deploy_relay::error::Result;
use deploy_relay::http::ApiClient;
use deploy_relay::output::Output;
use deploy_relay::target::CpanelClient;

/// Run one deployment end to end.
///
/// If the workflow fails before reaching a terminal state, every registered
/// cleanup action runs before the error is returned.
pub async fn deploy(config: DeployConfig, mut output: Output) -> Result<Outcome> {
    output.start_timer();

    let api = ApiClient::new(config.request_timeout, config.debug)?;
    let reporter = Arc::new(GitHubClient::new(
        api.clone(),
        &config.github.api_url,
        config.repo.clone(),
        &config.github.token,
    ));
    let target = CpanelClient::new(
        api,
        &config.cpanel.api_url,
        &config.cpanel.user,
        &config.cpanel.token,
    );

    let request = config.deployment_request();
    output.progress(&format!(
        "Deploying {} ({}) to {}",
        config.repo, request.revision, request.environment
    ));
    output.progress(&format!("  → Server checkout: {}", request.repository_root));

    let mut cleanup = CleanupRegistry::new();
    match deploy::run(request, reporter, &target, &config.poll, &mut cleanup).await {
        Ok(outcome) => {
            let message = match outcome {
                Outcome::Success => "Deployment succeeded",
                Outcome::Failure => "Deployment failed on the server",
                Outcome::Timeout => "Gave up waiting for the deployment to finish",
            };
            output.finished(outcome, message);
            Ok(outcome)
        }
        Err(e) => {
            tracing::error!("Deployment aborted: {}", e);
            let result = cleanup.run_all_and_clear().await;
            for failure in &result.failed {
                output.warning(&format!(
                    "cleanup action '{}' failed: {}",
                    failure.action, failure.error
                ));
            }
            Err(e.into())
        }
    }
}
