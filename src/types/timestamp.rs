// ABOUTME: Opaque remote timestamp as reported by cPanel.
// ABOUTME: Kept verbatim for status descriptions; only presence is meaningful.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A timestamp string from the deploy target. cPanel sends epoch seconds,
/// sometimes as a string and sometimes as a number; either way it is shown
/// to users exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RemoteTimestamp(String);

impl RemoteTimestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deserialize an optional timestamp, treating `null`, `""`, `0` and
/// `false` as absent.
pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<RemoteTimestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(RemoteTimestamp(s)),
        serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => {
            Some(RemoteTimestamp(n.to_string()))
        }
        _ => None,
    }))
}
