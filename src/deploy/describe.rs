// ABOUTME: Human-readable descriptions attached to each deployment status.
// ABOUTME: Kept in one place so the wording of the timeline stays consistent.

use std::time::Duration;

use crate::target::TerminalFact;
use crate::types::{DeployHandle, RemoteTimestamp, TaskId};

pub const INITIALIZING: &str = "Initializing deployment";

pub const ABORTED: &str = "Deployment aborted unexpectedly, see the workflow log";

/// Task ID for display. Missing IDs read as "unknown".
pub(crate) fn task_label(task: Option<&TaskId>) -> &str {
    task.map_or("unknown", TaskId::as_str)
}

pub fn queued(
    handle: &DeployHandle,
    at: Option<&RemoteTimestamp>,
    task: Option<&TaskId>,
) -> String {
    let at = at.map_or("unknown time", RemoteTimestamp::as_str);
    let task = task_label(task);
    format!("Deployment {handle} queued at {at} (task {task})")
}

pub fn started(handle: &DeployHandle, at: &RemoteTimestamp, task: Option<&TaskId>) -> String {
    let task = task_label(task);
    format!("Deployment {handle} began running at {at} (task {task})")
}

pub fn finished(handle: &DeployHandle, fact: &TerminalFact, task: Option<&TaskId>) -> String {
    let task = task_label(task);
    match fact {
        TerminalFact::Succeeded(at) => {
            format!("Deployment {handle} succeeded at {at} (task {task})")
        }
        TerminalFact::Failed(at) => format!("Deployment {handle} FAILED at {at} (task {task})"),
        TerminalFact::Canceled(at) => {
            format!("Deployment {handle} CANCELED at {at} (task {task})")
        }
    }
}

pub fn timed_out(waited: Duration) -> String {
    format!(
        "No deployment response after {}, aborting action",
        human_duration(waited)
    )
}

fn human_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if duration.subsec_nanos() != 0 {
        return humantime::format_duration(duration).to_string();
    }
    match secs {
        60 => "1 minute".to_string(),
        s if s > 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}
