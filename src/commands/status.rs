// ABOUTME: Status command implementation.
// ABOUTME: Reads one cPanel deployment snapshot, e.g. to reconcile an interrupted run.

use deploy_relay::deploy::{DeployError, Step};
use deploy_relay::error::Result;
use deploy_relay::http::ApiClient;
use deploy_relay::output::{Output, OutputMode};
use deploy_relay::target::{CpanelClient, DeployTarget};
use deploy_relay::types::DeployHandle;
use secrecy::SecretString;

use crate::cli::StatusArgs;

pub async fn status(args: StatusArgs, debug: bool, output: Output) -> Result<()> {
    let api = ApiClient::new(args.cpanel.request_timeout, debug)?;
    let token = SecretString::from(args.cpanel.token);
    let target = CpanelClient::new(api, &args.cpanel.api_url, &args.cpanel.user, &token);
    let handle = DeployHandle::new(args.deploy_id);

    let snapshot = target
        .deployment_status(&handle)
        .await
        .map_err(|source| DeployError::Target {
            step: Step::PollStatus,
            source,
        })?;

    match output.mode() {
        OutputMode::Json => {
            let event = serde_json::json!({
                "event": "status",
                "deploy_id": handle,
                "phase": snapshot.phase(),
                "task_id": snapshot.task_id,
                "timestamps": snapshot.timestamps,
            });
            println!("{event}");
        }
        OutputMode::Quiet => println!("{}", snapshot.phase()),
        OutputMode::Normal => {
            let task = snapshot.task_id.as_ref().map_or("unknown", |t| t.as_str());
            println!("Deployment {} (task {}): {}", handle, task, snapshot.phase());
            let timestamps = &snapshot.timestamps;
            for (name, value) in [
                ("queued", &timestamps.queued),
                ("active", &timestamps.active),
                ("succeeded", &timestamps.succeeded),
                ("failed", &timestamps.failed),
                ("canceled", &timestamps.canceled),
            ] {
                if let Some(at) = value {
                    println!("  {name:<10} {at}");
                }
            }
        }
    }

    Ok(())
}
