// ABOUTME: Remote deployment snapshot types decoded from cPanel `data` payloads.
// ABOUTME: Exposes which terminal fact, if any, a snapshot records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{DeployHandle, RemoteTimestamp, TaskId, deserialize_optional_timestamp};

/// Result of `VersionControl/update`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResult {
    /// False when the checkout has local changes or lacks a `.cpanel.yml`.
    #[serde(deserialize_with = "deserialize_flag")]
    pub deployable: bool,
}

/// Result of `VersionControlDeployment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentCreated {
    pub deploy_id: DeployHandle,
    /// Display only; some cPanel builds omit it.
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// Result of `VCDeployStatus/retrieve`: the target's current view of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl DeploymentSnapshot {
    pub fn terminal(&self) -> Option<TerminalFact> {
        self.timestamps.terminal()
    }

    /// Most advanced lifecycle phase recorded, for display.
    pub fn phase(&self) -> &'static str {
        match self.terminal() {
            Some(TerminalFact::Succeeded(_)) => "succeeded",
            Some(TerminalFact::Failed(_)) => "failed",
            Some(TerminalFact::Canceled(_)) => "canceled",
            None if self.timestamps.active.is_some() => "active",
            None if self.timestamps.queued.is_some() => "queued",
            None => "unknown",
        }
    }
}

/// Lifecycle timestamps. Each appears once and is never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub queued: Option<RemoteTimestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<RemoteTimestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub succeeded: Option<RemoteTimestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub failed: Option<RemoteTimestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub canceled: Option<RemoteTimestamp>,
}

/// A terminal fact recorded by the deploy target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalFact {
    Succeeded(RemoteTimestamp),
    Failed(RemoteTimestamp),
    Canceled(RemoteTimestamp),
}

impl Timestamps {
    /// The terminal fact, checked in priority order: succeeded, failed, canceled.
    pub fn terminal(&self) -> Option<TerminalFact> {
        if let Some(at) = &self.succeeded {
            return Some(TerminalFact::Succeeded(at.clone()));
        }
        if let Some(at) = &self.failed {
            return Some(TerminalFact::Failed(at.clone()));
        }
        self.canceled.clone().map(TerminalFact::Canceled)
    }
}

/// cPanel encodes booleans as JSON booleans or as 0/1.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(n) => Ok(n != 0),
        Flag::Text(s) => match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean flag, got '{other}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(timestamps: serde_json::Value) -> DeploymentSnapshot {
        serde_json::from_value(json!({"task_id": "00000000/abc", "timestamps": timestamps}))
            .unwrap()
    }

    #[test]
    fn no_terminal_fact_while_queued_or_active() {
        assert_eq!(snapshot(json!({"queued": "1700000000"})).terminal(), None);
        assert_eq!(
            snapshot(json!({"queued": "1700000000", "active": "1700000005"})).terminal(),
            None
        );
    }

    #[test]
    fn succeeded_wins_over_failed_and_canceled() {
        let snap = snapshot(json!({
            "succeeded": "3",
            "failed": "2",
            "canceled": "1"
        }));
        assert_eq!(
            snap.terminal(),
            Some(TerminalFact::Succeeded(RemoteTimestamp::new("3")))
        );
    }

    #[test]
    fn failed_wins_over_canceled() {
        let snap = snapshot(json!({"failed": "2", "canceled": "1"}));
        assert_eq!(
            snap.terminal(),
            Some(TerminalFact::Failed(RemoteTimestamp::new("2")))
        );
    }

    #[test]
    fn null_and_empty_timestamps_are_absent() {
        let snap = snapshot(json!({"queued": "5", "active": null, "succeeded": ""}));
        assert!(snap.timestamps.active.is_none());
        assert_eq!(snap.terminal(), None);
    }

    #[test]
    fn numeric_timestamps_are_kept_verbatim() {
        let snap = snapshot(json!({"canceled": 1700000000.25}));
        assert_eq!(
            snap.terminal(),
            Some(TerminalFact::Canceled(RemoteTimestamp::new("1700000000.25")))
        );
    }

    #[test]
    fn missing_timestamps_object_defaults_to_empty() {
        let snap: DeploymentSnapshot =
            serde_json::from_value(json!({"task_id": 7})).unwrap();
        assert_eq!(snap.task_id, Some(TaskId::new("7")));
        assert_eq!(snap.timestamps, Timestamps::default());
    }

    #[test]
    fn phase_tracks_the_latest_timestamp() {
        assert_eq!(snapshot(json!({})).phase(), "unknown");
        assert_eq!(snapshot(json!({"queued": "1"})).phase(), "queued");
        assert_eq!(snapshot(json!({"queued": "1", "active": "2"})).phase(), "active");
        assert_eq!(
            snapshot(json!({"active": "2", "canceled": "3"})).phase(),
            "canceled"
        );
    }

    #[test]
    fn deployable_accepts_integer_flags() {
        let sync: SyncResult = serde_json::from_value(json!({"deployable": 0})).unwrap();
        assert!(!sync.deployable);
        let sync: SyncResult = serde_json::from_value(json!({"deployable": 1})).unwrap();
        assert!(sync.deployable);
        let sync: SyncResult = serde_json::from_value(json!({"deployable": true})).unwrap();
        assert!(sync.deployable);
    }

    #[test]
    fn task_id_is_optional() {
        let created: DeploymentCreated =
            serde_json::from_value(json!({"deploy_id": 9, "timestamps": {"queued": "T0"}}))
                .unwrap();
        assert_eq!(created.deploy_id, DeployHandle::new("9"));
        assert_eq!(created.task_id, None);

        let snap: DeploymentSnapshot =
            serde_json::from_value(json!({"timestamps": {"active": "T1"}})).unwrap();
        assert_eq!(snap.task_id, None);
        assert_eq!(snap.phase(), "active");
    }
}
